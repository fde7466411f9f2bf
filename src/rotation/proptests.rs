//! Property-based tests for the rotation cursor

use super::*;
use proptest::prelude::*;
use tempfile::TempDir;

fn synthetic_catalog(total: usize) -> Catalog {
    let entries = (0..total)
        .map(|i| {
            WordEntry::new(
                format!("word{i}"),
                format!("meaning {i}"),
                format!("example {i}"),
                format!("pron {i}"),
            )
        })
        .collect();
    Catalog::from_entries(entries).unwrap()
}

fn rotation_with(dir: &TempDir, total: usize) -> Rotation {
    Rotation::new(
        Arc::new(synthetic_catalog(total)),
        Arc::new(ProgressStore::open(dir.path().join("progress.json"))),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Two full laps visit every index once per lap, in ascending order
    #[test]
    fn prop_round_robin_visits_every_index(total in 1usize..12, conv in "[A-Za-z0-9]{1,8}") {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_with(&dir, total);

        let served: Vec<usize> = (0..total * 2)
            .map(|_| rotation.pick_next(&conv).unwrap().index)
            .collect();
        let expected: Vec<usize> = (0..total).chain(0..total).collect();
        prop_assert_eq!(served, expected);
    }

    /// Advancing one conversation never moves another's cursor
    #[test]
    fn prop_conversations_are_isolated(
        total in 1usize..12,
        a_steps in 0usize..20,
        b_steps in 0usize..20,
    ) {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_with(&dir, total);

        for _ in 0..b_steps {
            rotation.pick_next("B").unwrap();
        }
        let b_before = rotation.progress().get("B");
        for _ in 0..a_steps {
            rotation.pick_next("A").unwrap();
        }

        prop_assert_eq!(rotation.progress().get("B"), b_before);
        prop_assert_eq!(rotation.progress().get("A").index, a_steps % total);
    }

    /// A cursor left over from a longer catalog is read modulo the new length
    #[test]
    fn prop_stale_cursor_wraps(total in 1usize..12, stale in 0usize..1000) {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_with(&dir, total);
        rotation.progress().update("C", |p| p.index = stale).unwrap();

        let pick = rotation.pick_next("C").unwrap();
        prop_assert_eq!(pick.index, stale % total);
        prop_assert!(rotation.progress().get("C").index < total);
    }

    /// The last served entry is always the one just returned
    #[test]
    fn prop_last_served_matches_pick(total in 1usize..12, steps in 1usize..30) {
        let dir = TempDir::new().unwrap();
        let rotation = rotation_with(&dir, total);

        let mut last = None;
        for _ in 0..steps {
            last = Some(rotation.pick_next("C").unwrap().index);
        }
        prop_assert_eq!(rotation.last_served("C").map(|s| s.index), last);
    }
}
