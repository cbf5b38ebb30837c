/// Key classes the engine understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Char(char),
    Other,
}

impl Key {
    /// Classify a key name: `"Backspace"`, a single character, or anything else.
    pub fn parse(name: &str) -> Key {
        if name == "Backspace" {
            return Key::Backspace;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Outcome of one character against the active word
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Input extended; `completes` when it finished the paragraph's last word
    Accept { completes: bool },
    /// Space on a fully typed word
    Complete,
    /// Rejected; `space_hint` when the word was already done and needed a space
    Mistake { space_hint: bool },
}

pub fn judge(input: &str, target: &str, c: char, is_last_word: bool) -> Verdict {
    if c == ' ' {
        return if input == target {
            Verdict::Complete
        } else {
            Verdict::Mistake { space_hint: false }
        };
    }

    let mut next = String::with_capacity(input.len() + c.len_utf8());
    next.push_str(input);
    next.push(c);

    if target.starts_with(&next) {
        Verdict::Accept {
            completes: is_last_word && next == target,
        }
    } else {
        Verdict::Mistake {
            space_hint: input == target && !is_last_word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_keys() {
        assert_eq!(Key::parse("Backspace"), Key::Backspace);
        assert_eq!(Key::parse("a"), Key::Char('a'));
        assert_eq!(Key::parse(" "), Key::Char(' '));
        assert_eq!(Key::parse("é"), Key::Char('é'));
        assert_eq!(Key::parse("Shift"), Key::Other);
        assert_eq!(Key::parse("F5"), Key::Other);
        assert_eq!(Key::parse(""), Key::Other);
    }

    #[test]
    fn test_prefix_is_accepted() {
        assert_matches!(judge("", "quick", 'q', false), Verdict::Accept { completes: false });
        assert_matches!(judge("qui", "quick", 'c', false), Verdict::Accept { completes: false });
    }

    #[test]
    fn test_finishing_last_word_completes() {
        assert_matches!(judge("fo", "fox", 'x', true), Verdict::Accept { completes: true });
        assert_matches!(judge("fo", "fox", 'x', false), Verdict::Accept { completes: false });
    }

    #[test]
    fn test_wrong_char_is_mistake() {
        assert_matches!(judge("q", "quick", 'x', false), Verdict::Mistake { space_hint: false });
    }

    #[test]
    fn test_typing_past_a_finished_word_hints_space() {
        assert_matches!(judge("the", "the", 'q', false), Verdict::Mistake { space_hint: true });
        assert_matches!(judge("the", "the", 'q', true), Verdict::Mistake { space_hint: false });
    }

    #[test]
    fn test_space() {
        assert_matches!(judge("the", "the", ' ', false), Verdict::Complete);
        assert_matches!(judge("th", "the", ' ', false), Verdict::Mistake { space_hint: false });
        assert_matches!(judge("", "the", ' ', false), Verdict::Mistake { space_hint: false });
    }
}
