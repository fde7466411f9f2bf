//! Round-robin word rotation
//!
//! Each conversation owns a cursor into the catalog. Serving a word returns
//! the entry under the cursor and moves it forward by one, wrapping at the
//! catalog length.

#[cfg(test)]
mod proptests;

use crate::catalog::{Catalog, WordEntry};
use crate::progress::{ProgressResult, ProgressStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A word picked for delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub index: usize,
    pub entry: &'a WordEntry,
}

pub struct Rotation {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressStore>,
}

impl Rotation {
    pub fn new(catalog: Arc<Catalog>, progress: Arc<ProgressStore>) -> Self {
        Self { catalog, progress }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Serve the next word for `conversation_id` and persist the advanced cursor
    pub fn pick_next(&self, conversation_id: &str) -> ProgressResult<Selection<'_>> {
        self.pick_next_at(conversation_id, Utc::now())
    }

    pub fn pick_next_at(
        &self,
        conversation_id: &str,
        now: DateTime<Utc>,
    ) -> ProgressResult<Selection<'_>> {
        let total = self.catalog.len();
        let served = self.progress.update(conversation_id, |progress| {
            let served = progress.index % total;
            progress.index = (served + 1) % total;
            progress.last_sent_at = Some(now);
            served
        })?;

        Ok(Selection {
            index: served,
            entry: self.catalog.get_wrapped(served),
        })
    }

    /// The entry most recently served to `conversation_id`, one step behind
    /// the cursor. `None` until the conversation has received a word.
    pub fn last_served(&self, conversation_id: &str) -> Option<Selection<'_>> {
        let progress = self.progress.get(conversation_id);
        if !progress.has_delivered() {
            return None;
        }
        let total = self.catalog.len();
        let index = (progress.index % total + total - 1) % total;
        Some(Selection {
            index,
            entry: self.catalog.get_wrapped(index),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rotation_in(dir: &TempDir) -> Rotation {
        Rotation::new(
            Arc::new(Catalog::builtin()),
            Arc::new(ProgressStore::open(dir.path().join("progress.json"))),
        )
    }

    #[test]
    fn test_first_pick_is_index_zero() {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_in(&dir);

        let first = rotation.pick_next("C1").unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.entry.word, "bonjour");
        assert_eq!(rotation.progress().get("C1").index, 1);
        assert!(rotation.progress().get("C1").has_delivered());
    }

    #[test]
    fn test_wraps_at_catalog_end() {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_in(&dir);
        let total = rotation.catalog().len();

        for _ in 0..total {
            rotation.pick_next("C1").unwrap();
        }
        assert_eq!(rotation.progress().get("C1").index, 0);
        assert_eq!(rotation.pick_next("C1").unwrap().index, 0);
    }

    #[test]
    fn test_last_served_trails_cursor() {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_in(&dir);

        assert!(rotation.last_served("C1").is_none());

        rotation.pick_next("C1").unwrap();
        rotation.pick_next("C1").unwrap();
        let last = rotation.last_served("C1").unwrap();
        assert_eq!(last.index, 1);
        assert_eq!(last.entry.word, "merci");
        // Reading the last word does not move the cursor
        assert_eq!(rotation.progress().get("C1").index, 2);
    }

    #[test]
    fn test_last_served_after_wrap_is_final_entry() {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_in(&dir);
        let total = rotation.catalog().len();

        for _ in 0..total {
            rotation.pick_next("C1").unwrap();
        }
        assert_eq!(rotation.last_served("C1").unwrap().index, total - 1);
    }

    #[test]
    fn test_cursor_survives_restart() {
        let dir = TempDir::new().unwrap();
        {
            let rotation = rotation_in(&dir);
            rotation.pick_next("C1").unwrap();
            rotation.pick_next("C1").unwrap();
            rotation.pick_next("C2").unwrap();
        }

        let rotation = rotation_in(&dir);
        assert_eq!(rotation.progress().get("C1").index, 2);
        assert_eq!(rotation.progress().get("C2").index, 1);
        assert_eq!(rotation.pick_next("C1").unwrap().index, 2);
    }

    #[test]
    fn test_failed_pick_does_not_skip_word() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("progress.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), "x").unwrap();
        let rotation = Rotation::new(
            Arc::new(Catalog::builtin()),
            Arc::new(ProgressStore::open(&target)),
        );

        assert!(rotation.pick_next("C1").is_err());
        assert_eq!(rotation.progress().get("C1").index, 0);
        assert!(rotation.last_served("C1").is_none());

        // Once the file can be written, the same word is served
        std::fs::remove_dir_all(&target).unwrap();
        assert_eq!(rotation.pick_next("C1").unwrap().entry.word, "bonjour");
    }

    #[test]
    fn test_concurrent_picks_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let rotation = Arc::new(rotation_in(&dir));
        let total = rotation.catalog().len();
        let threads = total * 2;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let rotation = Arc::clone(&rotation);
                std::thread::spawn(move || rotation.pick_next("C1").unwrap().index)
            })
            .collect();

        let mut served: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        served.sort_unstable();
        let expected: Vec<usize> = (0..total).flat_map(|i| [i, i]).collect();
        assert_eq!(served, expected);
        assert_eq!(rotation.progress().get("C1").index, 0);
    }
}
