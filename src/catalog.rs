//! Word catalog
//!
//! The ordered list of vocabulary entries served by the rotation. Loaded once
//! at startup and shared read-only afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A single vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub meaning: String,
    pub example: String,
    pub pronunciation: String,
}

impl WordEntry {
    pub fn new(
        word: impl Into<String>,
        meaning: impl Into<String>,
        example: impl Into<String>,
        pronunciation: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            example: example.into(),
            pronunciation: pronunciation.into(),
        }
    }

    /// Every field carries text once trimmed
    pub fn is_complete(&self) -> bool {
        [
            &self.word,
            &self.meaning,
            &self.example,
            &self.pronunciation,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("cannot read word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("word list is not a JSON array of entries: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word list has no usable entries")]
    Empty,
}

/// Where the active catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    File,
    Default,
}

/// Non-empty ordered sequence of word entries
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<WordEntry>,
    source: CatalogSource,
}

impl Catalog {
    /// Build from explicit entries. Returns `None` when no complete entry
    /// remains, since an empty catalog cannot be rotated.
    pub fn from_entries(entries: Vec<WordEntry>) -> Option<Self> {
        let entries: Vec<WordEntry> = entries.into_iter().filter(WordEntry::is_complete).collect();
        if entries.is_empty() {
            return None;
        }
        Some(Self {
            entries,
            source: CatalogSource::File,
        })
    }

    /// The built-in word list
    pub fn builtin() -> Self {
        Self {
            entries: default_entries(),
            source: CatalogSource::Default,
        }
    }

    /// Load the catalog from `path`, falling back to the built-in list when
    /// the file is missing, malformed or holds nothing usable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_entries(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Falling back to built-in word list"
                );
                Self::builtin()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    /// Entry at `index`, wrapped to the catalog length
    pub fn get_wrapped(&self, index: usize) -> &WordEntry {
        &self.entries[index % self.entries.len()]
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }
}

fn read_entries(path: &Path) -> Result<Catalog, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    // Decode per element; malformed entries count as dropped
    let raw_entries: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
    let total = raw_entries.len();
    let parsed: Vec<WordEntry> = raw_entries
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    let catalog = Catalog::from_entries(parsed).ok_or(CatalogError::Empty)?;
    let dropped = total - catalog.len();
    if dropped > 0 {
        tracing::warn!(
            path = %path.display(),
            dropped,
            "Ignoring malformed or incomplete word entries"
        );
    }
    Ok(catalog)
}

fn default_entries() -> Vec<WordEntry> {
    vec![
        WordEntry::new(
            "bonjour",
            "hello; good morning",
            "Bonjour, comment allez-vous ?",
            "bohn-ZHOOR",
        ),
        WordEntry::new(
            "merci",
            "thank you",
            "Merci pour ton aide.",
            "mehr-SEE",
        ),
        WordEntry::new(
            "chien",
            "dog",
            "Le chien joue dans le jardin.",
            "shee-AN",
        ),
        WordEntry::new(
            "fromage",
            "cheese",
            "J'adore le fromage français.",
            "froh-MAHZH",
        ),
        WordEntry::new(
            "bibliothèque",
            "library",
            "Je vais à la bibliothèque ce soir.",
            "bee-blee-oh-TEK",
        ),
        WordEntry::new(
            "papillon",
            "butterfly",
            "Un papillon s'est posé sur la fleur.",
            "pah-pee-YOHN",
        ),
        WordEntry::new(
            "demain",
            "tomorrow",
            "On se voit demain matin.",
            "duh-MAN",
        ),
    ]
}
