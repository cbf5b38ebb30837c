use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;

use super::{sanitize_paragraph, ContentError, ContentSource};

/// Paragraphs read from a user-supplied text file, served in order and cycling.
///
/// Paragraphs are separated by blank lines.
#[derive(Debug)]
pub struct FileSource {
    paragraphs: Vec<String>,
    cursor: AtomicUsize,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P, max_chars: usize) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let paragraphs = parse_paragraphs(&text, max_chars);
        if paragraphs.is_empty() {
            return Err(ContentError::Empty(path.to_path_buf()));
        }
        info!("loaded {} paragraphs from {}", paragraphs.len(), path.display());
        Ok(Self {
            paragraphs,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

fn parse_paragraphs(text: &str, max_chars: usize) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(' ');
        current.push_str(line);
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
        .iter()
        .map(|p| sanitize_paragraph(p, max_chars))
        .filter(|p| !p.is_empty())
        .collect()
}

impl ContentSource for FileSource {
    fn fetch_paragraph(&self) -> String {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.paragraphs.len();
        self.paragraphs[idx].clone()
    }
}
