//! Document source abstraction.
//!
//! The projection pipeline only needs "a named JSON document or nothing";
//! this trait decouples it from where documents come from. Implementations:
//!
//! - Directory of saved fetch outputs (the CI layout, used by the binary)
//! - In-memory map (for testing)
//! - The live HTTP client in [`crate::runalyze`] feeds the same pipeline
//!   through its own document struct.

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// A provider of named JSON documents.
///
/// Any failure (missing file, unreadable content, non-JSON payload) degrades
/// to an absent document; sources never raise.
pub trait DocumentSource {
    /// Loads one named document, or `None` when it is unavailable.
    fn document(&self, name: &str) -> Option<Value>;
}

/// Directory-backed source reading `<name>.json` files.
///
/// Matches the layout the fetch pipeline writes (`docs/data/<user>_marathon.json`,
/// `docs/data/<user>_vo2.json`).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySource { dir: dir.into() }
    }
}

impl DocumentSource for DirectorySource {
    fn document(&self, name: &str) -> Option<Value> {
        let path = self.dir.join(format!("{}.json", name));
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!("document {} absent: {}", path.display(), err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::warn!("document {} is not valid JSON: {}", path.display(), err);
                None
            }
        }
    }
}

/// In-memory document source for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: HashMap<String, Value>,
}

impl InMemorySource {
    /// Creates an empty in-memory source.
    pub fn new() -> Self {
        InMemorySource {
            documents: HashMap::new(),
        }
    }

    /// Adds a named document.
    pub fn add_document(&mut self, name: impl Into<String>, document: Value) {
        self.documents.insert(name.into(), document);
    }
}

impl DocumentSource for InMemorySource {
    fn document(&self, name: &str) -> Option<Value> {
        self.documents.get(name).cloned()
    }
}
