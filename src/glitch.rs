//! Word mutations: pure transforms from a ground-truth word to the string shown on screen.
//!
//! Correctness is always checked against the ground truth; these only change what
//! the player has to read.

/// Maximum number of leet replacements applied to a single word
pub const LEET_LIMIT: usize = 3;

fn leet_char(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        'a' => Some('4'),
        'e' => Some('3'),
        'i' | 'l' => Some('1'),
        'o' => Some('0'),
        's' => Some('5'),
        't' => Some('7'),
        'g' => Some('9'),
        'z' => Some('2'),
        _ => None,
    }
}

/// Replace up to [`LEET_LIMIT`] eligible characters, greedily from the left.
pub fn to_leet(word: &str) -> String {
    let mut replaced = 0;
    word.chars()
        .map(|c| match leet_char(c) {
            Some(sub) if replaced < LEET_LIMIT => {
                replaced += 1;
                sub
            }
            _ => c,
        })
        .collect()
}

/// Shuffle the interior of a word, keeping the first and last characters in place.
///
/// The shuffle is a Fisher-Yates pass whose "random" index is derived from `seed`,
/// so the same word and seed always produce the same anagram.
pub fn scramble_internal(word: &str, seed: i64) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= 3 {
        return word.to_string();
    }

    let mut middle = chars[1..chars.len() - 1].to_vec();
    for i in (1..middle.len()).rev() {
        let mixed = seed
            .wrapping_mul(9301)
            .wrapping_add(49297)
            .wrapping_add(i as i64);
        let j = ((mixed % 233_280).unsigned_abs() as usize) % (i + 1);
        middle.swap(i, j);
    }

    let mut out = String::with_capacity(word.len());
    out.push(chars[0]);
    out.extend(middle);
    out.push(chars[chars.len() - 1]);
    out
}

/// Swap disjoint adjacent pairs inside the middle third of the word.
pub fn swap_adjacent(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    if len < 3 {
        return word.to_string();
    }

    let start = len / 3;
    let end = (2 * len).div_ceil(3);
    let mut i = start;
    while i + 1 < end {
        chars.swap(i, i + 1);
        i += 2;
    }

    chars.into_iter().collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Mutation {
    Leet,
    SwapAdjacent,
    Scramble,
}

impl Mutation {
    pub fn apply(self, word: &str, seed: i64) -> String {
        match self {
            Mutation::Leet => to_leet(word),
            Mutation::SwapAdjacent => swap_adjacent(word),
            Mutation::Scramble => scramble_internal(word, seed),
        }
    }
}

/// Mutations applied per level, in order. Levels not listed show the plain word.
pub const LEVEL_MUTATIONS: &[(u32, &[Mutation])] = &[
    (1, &[Mutation::Leet]),
    (3, &[Mutation::SwapAdjacent]),
    (5, &[Mutation::Scramble]),
    (6, &[Mutation::Leet, Mutation::Scramble]),
];

pub fn mutations_for(level: u32) -> &'static [Mutation] {
    LEVEL_MUTATIONS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, m)| *m)
        .unwrap_or(&[])
}

/// Display form of `word` at `level`; `index` (the word's position) seeds the scramble.
pub fn display_word(level: u32, word: &str, index: usize) -> String {
    mutations_for(level)
        .iter()
        .fold(word.to_string(), |acc, m| m.apply(&acc, index as i64))
}
