//! Property-based tests for benchkit
//!
//! - Resume invariants of the raw result store
//! - Aggregation invariants of the formatter
//! - Ranking invariants of the exporter
//!
//! Cases are kept small: every store case touches the filesystem.

use benchkit::aggregate::{mean_std, summarize};
use benchkit::rank::{top_k_indices, SortOrder};
use benchkit::record::{Scores, TrialRecord};
use benchkit::ResultStore;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Scores for `n` repeats over a fixed metric set.
fn arb_repeats(max: usize) -> impl Strategy<Value = Vec<Scores>> {
    proptest::collection::vec((0.0f64..1.0, 0.0f64..10.0), 0..max).prop_map(|rows| {
        rows.into_iter()
            .map(|(acc, mae)| {
                let mut scores = Scores::new();
                scores.insert("accuracy".to_string(), acc);
                scores.insert("mae".to_string(), mae);
                scores
            })
            .collect()
    })
}

fn arb_means(max: usize) -> impl Strategy<Value = Vec<Option<f64>>> {
    proptest::collection::vec(proptest::option::of(-1.0f64..1.0), 0..max)
}

fn metric_set() -> Vec<String> {
    vec!["accuracy".to_string(), "mae".to_string()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: counting after appending N complete repeats yields N
    #[test]
    fn prop_count_matches_appended(repeats in arb_repeats(20)) {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store.append_repeats("ds", "m", &repeats).unwrap();

        let count = store.count_existing_repeats("ds", "m", &metric_set()).unwrap();
        prop_assert_eq!(count, repeats.len() as u64);
    }

    /// Property: two appends give A+B repeats with contiguous indices
    #[test]
    fn prop_resumed_appends_are_contiguous(
        first in arb_repeats(10),
        second in arb_repeats(10),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store.append_repeats("ds", "m", &first).unwrap();
        let existing = store.count_existing_repeats("ds", "m", &metric_set()).unwrap();
        prop_assert_eq!(existing, first.len() as u64);
        store.append_repeats("ds", "m", &second).unwrap();

        let trials = store.read_raw("ds").unwrap().unwrap_or_default();
        let accuracy: Vec<u64> = trials
            .iter()
            .filter(|t| t.metric() == "accuracy")
            .map(TrialRecord::repeat)
            .collect();
        let expected: Vec<u64> = (0..(first.len() + second.len()) as u64).collect();
        prop_assert_eq!(accuracy, expected);
        prop_assert_eq!(trials.len(), 2 * (first.len() + second.len()));
    }

    /// Property: mean lies within [min, max] and std is non-negative
    #[test]
    fn prop_mean_within_bounds(values in proptest::collection::vec(-100.0f64..100.0, 1..50)) {
        let (mean, std) = mean_std(&values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(mean >= min - 1e-9 && mean <= max + 1e-9);
        prop_assert_eq!(std.is_some(), values.len() >= 2);
        if let Some(std) = std {
            prop_assert!(std >= 0.0);
        }
    }

    /// Property: summary counts add up to the number of raw records
    #[test]
    fn prop_summary_counts_total(values in proptest::collection::vec((0u8..3, 0u8..2, 0.0f64..1.0), 0..60)) {
        let trials: Vec<TrialRecord> = values
            .iter()
            .enumerate()
            .map(|(i, (m, k, v))| TrialRecord::new(format!("m{m}"), i as u64, format!("k{k}"), *v))
            .collect();
        let rows = summarize(&trials);
        let total: u64 = rows.iter().map(|r| r.repeat_count()).sum();
        prop_assert_eq!(total, trials.len() as u64);
        prop_assert!(rows.len() <= 6);
    }

    /// Property: summarize is deterministic
    #[test]
    fn prop_summarize_deterministic(values in proptest::collection::vec((0u8..3, 0.0f64..1.0), 0..40)) {
        let trials: Vec<TrialRecord> = values
            .iter()
            .map(|(m, v)| TrialRecord::new(format!("m{m}"), 0, "accuracy", *v))
            .collect();
        prop_assert_eq!(summarize(&trials), summarize(&trials));
    }

    /// Property: the best index holds the maximum valid mean
    #[test]
    fn prop_best_is_maximum(means in arb_means(12)) {
        let ranked = top_k_indices(&means, 2, SortOrder::Descending);
        let valid = means.iter().filter(|m| m.is_some()).count();
        prop_assert_eq!(ranked.len(), valid.min(2));

        if let Some(&best) = ranked.first() {
            let max = means.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(means[best], Some(max));
        }
        if ranked.len() == 2 {
            prop_assert!(means[ranked[0]] >= means[ranked[1]]);
        }
    }
}
