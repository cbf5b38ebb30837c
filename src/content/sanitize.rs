/// Rough upper bound on paragraph length, in characters
pub const MAX_PARAGRAPH_CHARS: usize = 150;

/// Normalise raw text into lowercase letters and single spaces, cut at a word
/// boundary so the result is at most `max_chars` long.
///
/// Apostrophes are dropped ("don't" becomes "dont"); any other non-letter breaks
/// words apart. A first word longer than `max_chars` is kept whole.
pub fn sanitize_paragraph(raw: &str, max_chars: usize) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '\'' && *c != '’')
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let mut out = String::new();
    for word in cleaned.split_whitespace() {
        if out.is_empty() {
            out.push_str(word);
            continue;
        }
        if out.len() + 1 + word.len() > max_chars {
            break;
        }
        out.push(' ');
        out.push_str(word);
    }
    out
}
