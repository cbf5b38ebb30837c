use include_dir::{include_dir, Dir};
use log::warn;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::{ContentError, ContentSource};

static TEXT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/content/text");

/// Used only if the embedded corpus cannot be read
pub const LAST_RESORT: &str = "the system is stable for now so type these words to keep it that way";

#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub paragraphs: Vec<String>,
}

fn read_corpus(file_name: &str) -> Result<Corpus, ContentError> {
    let contents = TEXT_DIR
        .get_file(file_name)
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| ContentError::Empty(file_name.into()))?;

    let corpus: Corpus = serde_json::from_str(contents)?;
    if corpus.paragraphs.is_empty() {
        return Err(ContentError::Empty(file_name.into()));
    }
    Ok(corpus)
}

/// Built-in paragraphs compiled into the binary
#[derive(Debug, Clone)]
pub struct StaticSource {
    paragraphs: Vec<String>,
}

impl StaticSource {
    pub fn new() -> Self {
        let paragraphs = match read_corpus("builtin.json") {
            Ok(corpus) => corpus.paragraphs,
            Err(e) => {
                warn!("falling back to last-resort text: {e}");
                vec![LAST_RESORT.to_string()]
            }
        };
        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSource for StaticSource {
    fn fetch_paragraph(&self) -> String {
        let rng = &mut rand::thread_rng();
        self.paragraphs
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| LAST_RESORT.to_string())
    }
}
