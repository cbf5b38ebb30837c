pub mod fallback;
pub mod file;
pub mod sanitize;
pub mod sentences;

use std::fmt;
use std::io;
use std::path::PathBuf;

pub use fallback::StaticSource;
pub use file::FileSource;
pub use sanitize::{sanitize_paragraph, MAX_PARAGRAPH_CHARS};
pub use sentences::SentenceSource;

/// Supplies paragraphs of space-delimited words.
///
/// Implementations must never fail: any internal problem is absorbed by falling
/// back to built-in text. Sources are shared with background fetch threads.
pub trait ContentSource: Send + Sync {
    fn fetch_paragraph(&self) -> String;

    /// Fetch `count` paragraphs independently
    fn fetch_paragraph_batch(&self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.fetch_paragraph()).collect()
    }
}

/// Always hands out the same paragraph (custom prompts, tests)
#[derive(Debug, Clone)]
pub struct FixedSource {
    paragraph: String,
}

impl FixedSource {
    pub fn new(paragraph: impl Into<String>) -> Self {
        Self {
            paragraph: paragraph.into(),
        }
    }
}

impl ContentSource for FixedSource {
    fn fetch_paragraph(&self) -> String {
        self.paragraph.clone()
    }
}

/// Split a paragraph into ground-truth words, dropping empty tokens.
pub fn split_words(paragraph: &str) -> Vec<String> {
    paragraph.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug)]
pub enum ContentError {
    Io(io::Error),
    Parse(serde_json::Error),
    Empty(PathBuf),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Io(e) => write!(f, "unable to read text: {e}"),
            ContentError::Parse(e) => write!(f, "unable to parse corpus: {e}"),
            ContentError::Empty(path) => {
                write!(f, "no usable paragraphs in {}", path.display())
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Io(e) => Some(e),
            ContentError::Parse(e) => Some(e),
            ContentError::Empty(_) => None,
        }
    }
}

impl From<io::Error> for ContentError {
    fn from(e: io::Error) -> Self {
        ContentError::Io(e)
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_drops_empty_tokens() {
        assert_eq!(
            split_words("  the   quick\tfox \n"),
            vec!["the".to_string(), "quick".to_string(), "fox".to_string()]
        );
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_fixed_source_batch() {
        let source = FixedSource::new("hello world");
        let batch = source.fetch_paragraph_batch(3);
        assert_eq!(batch.len(), 3);
        assert!(batch.iter().all(|p| p == "hello world"));
    }

    #[test]
    fn test_content_error_display() {
        let err = ContentError::Empty(PathBuf::from("/tmp/words.txt"));
        assert_eq!(err.to_string(), "no usable paragraphs in /tmp/words.txt");

        let err: ContentError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ContentError::Io(_)));
    }
}
