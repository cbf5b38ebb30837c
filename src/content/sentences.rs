use cgisf_lib::cgisf;
use log::debug;
use rand::Rng;

use super::{sanitize_paragraph, ContentSource, StaticSource};

/// Paragraphs built from randomly generated sentences
#[derive(Debug, Clone)]
pub struct SentenceSource {
    sentences: usize,
    max_chars: usize,
    fallback: StaticSource,
}

impl SentenceSource {
    pub fn new(sentences: usize, max_chars: usize) -> Self {
        Self {
            sentences: sentences.max(1),
            max_chars,
            fallback: StaticSource::new(),
        }
    }

    fn generate(&self) -> String {
        let rng = &mut rand::thread_rng();
        let raw: Vec<String> = (0..self.sentences)
            .map(|_| {
                cgisf(
                    rng.gen_range(1..3),
                    rng.gen_range(1..3),
                    rng.gen_range(1..5),
                    rng.gen_bool(0.5),
                    rng.gen_range(1..3),
                    rng.gen_bool(0.5),
                )
            })
            .collect();
        sanitize_paragraph(&raw.join(" "), self.max_chars)
    }
}

impl ContentSource for SentenceSource {
    fn fetch_paragraph(&self) -> String {
        let paragraph = self.generate();
        if paragraph.is_empty() {
            debug!("sentence generator produced nothing usable, using built-in text");
            return self.fallback.fetch_paragraph();
        }
        paragraph
    }
}
