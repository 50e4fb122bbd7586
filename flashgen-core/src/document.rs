//! Access to the text of the note flashcards are generated from.

use std::io;
use std::path::PathBuf;

/// Supplies the active document's text, or `None` when nothing is open
pub trait DocumentSource: Send + Sync {
    fn active_document_text(&self) -> io::Result<Option<String>>;
}

/// A document whose text is already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    text: Option<String>,
}

impl InMemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// No document open
    pub fn none() -> Self {
        Self { text: None }
    }
}

impl DocumentSource for InMemoryDocument {
    fn active_document_text(&self) -> io::Result<Option<String>> {
        Ok(self.text.clone())
    }
}

/// A note file on disk, read when generation starts
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileDocument {
    fn active_document_text(&self) -> io::Result<Option<String>> {
        std::fs::read_to_string(&self.path).map(Some)
    }
}
