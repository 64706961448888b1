//! Top-K selection over nullable scores
//!
//! Used by the table exporter to find the best and second-best mean in each
//! dataset column. Missing (`None`) and NaN scores never rank.
//!
//! Ties keep input order: of two equal scores, the one that appears first in
//! the slice ranks higher. Selection is a stable sort, so the result does not
//! depend on the sort implementation.

use std::cmp::Ordering;

/// Sort order for Top-K selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (smallest K values)
    Ascending,
    /// Descending order (largest K values)
    Descending,
}

/// Indices of the top `k` scores in `values`, best first.
///
/// Returns fewer than `k` indices when fewer valid scores exist.
///
/// # Examples
///
/// ```rust
/// use benchkit::rank::{top_k_indices, SortOrder};
///
/// let means = [Some(0.8), None, Some(0.9), Some(0.8)];
/// assert_eq!(top_k_indices(&means, 2, SortOrder::Descending), vec![2, 0]);
/// assert_eq!(top_k_indices(&means, 5, SortOrder::Ascending), vec![0, 3, 2]);
/// ```
#[must_use]
pub fn top_k_indices(values: &[Option<f64>], k: usize, order: SortOrder) -> Vec<usize> {
    let mut valid: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| !x.is_nan()).map(|x| (i, x)))
        .collect();

    valid.sort_by(|(_, a), (_, b)| {
        let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });

    valid.into_iter().take(k).map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_picks_largest() {
        let values = [Some(0.8), Some(0.9)];
        assert_eq!(top_k_indices(&values, 2, SortOrder::Descending), vec![1, 0]);
    }

    #[test]
    fn test_skips_missing_and_nan() {
        let values = [None, Some(f64::NAN), Some(0.1)];
        assert_eq!(top_k_indices(&values, 2, SortOrder::Descending), vec![2]);
    }

    #[test]
    fn test_all_missing() {
        let values = [None, None];
        assert!(top_k_indices(&values, 2, SortOrder::Descending).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let values = [Some(0.5), Some(0.7), Some(0.7), Some(0.7)];
        assert_eq!(top_k_indices(&values, 2, SortOrder::Descending), vec![1, 2]);
    }

    #[test]
    fn test_k_zero() {
        assert!(top_k_indices(&[Some(1.0)], 0, SortOrder::Descending).is_empty());
    }
}
