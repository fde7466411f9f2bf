//! Per-conversation rotation progress
//!
//! The whole mapping lives in memory behind a mutex and is mirrored to a
//! JSON file after every mutation. The file is only read back at startup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("progress file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("progress file replace failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type ProgressResult<T> = Result<T, ProgressError>;

/// Rotation state for one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationProgress {
    /// Next catalog index to serve, read modulo the catalog length
    pub index: usize,
    pub last_sent_at: Option<DateTime<Utc>>,
}

impl ConversationProgress {
    /// Whether any word has been delivered to this conversation yet
    pub fn has_delivered(&self) -> bool {
        self.last_sent_at.is_some()
    }
}

type ProgressMap = BTreeMap<String, ConversationProgress>;

/// File-backed store of conversation progress
pub struct ProgressStore {
    path: PathBuf,
    conversations: Mutex<ProgressMap>,
}

impl ProgressStore {
    /// Open the store at `path`, rehydrating whatever state the file holds.
    /// A missing or unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let conversations = read_snapshot(&path);
        Self {
            path,
            conversations: Mutex::new(conversations),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of conversations known in memory
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Progress for `conversation_id`, created with defaults on first use.
    /// A newly created entry is not durable until the next save.
    pub fn get(&self, conversation_id: &str) -> ConversationProgress {
        self.lock()
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }

    /// Apply `f` to the progress of `conversation_id` and persist the whole
    /// mapping before releasing the lock, so concurrent updates to the same
    /// conversation are serialized. If the write fails the entry is restored
    /// to what it was before `f` ran.
    pub fn update<T>(
        &self,
        conversation_id: &str,
        f: impl FnOnce(&mut ConversationProgress) -> T,
    ) -> ProgressResult<T> {
        let mut conversations = self.lock();
        let previous = conversations.get(conversation_id).cloned();
        let out = f(conversations
            .entry(conversation_id.to_string())
            .or_default());

        if let Err(e) = write_snapshot(&self.path, &conversations) {
            match previous {
                Some(progress) => {
                    conversations.insert(conversation_id.to_string(), progress);
                }
                None => {
                    conversations.remove(conversation_id);
                }
            }
            return Err(e);
        }
        Ok(out)
    }

    /// Overwrite the durable copy with the current in-memory mapping
    pub fn save(&self) -> ProgressResult<()> {
        let conversations = self.lock();
        write_snapshot(&self.path, &conversations)
    }

    fn lock(&self) -> MutexGuard<'_, ProgressMap> {
        self.conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_snapshot(path: &Path) -> ProgressMap {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return ProgressMap::new();
    };
    match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Ignoring unreadable progress file");
            ProgressMap::new()
        }
    }
}

/// Write to a sibling temp file then rename over the target
fn write_snapshot(path: &Path, conversations: &ProgressMap) -> ProgressResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut temp, conversations)?;
    temp.write_all(b"\n")?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    tracing::debug!(
        path = %path.display(),
        conversations = conversations.len(),
        "Saved progress"
    );
    Ok(())
}
