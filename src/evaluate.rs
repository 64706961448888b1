//! Evaluator - turns a method's predictions into metric scores
//!
//! The [`Evaluator`] trait is the seam for plugging in domain-specific
//! evaluation. [`MetricEvaluator`] covers the common regression and
//! classification scores.

use crate::record::Scores;
use crate::registry::{Dataset, MethodDescriptor};
use crate::{Error, Result};

/// Metric used when an evaluation requests none.
pub const DEFAULT_METRIC: &str = "accuracy";

/// Metrics understood by [`MetricEvaluator`].
pub const SUPPORTED_METRICS: [&str; 5] = ["accuracy", "mse", "mae", "rmse", "r2"];

/// Computes scores for one method on one dataset.
pub trait Evaluator: Send + Sync {
    /// Evaluate `method` on `dataset`, returning one score per requested
    /// metric.
    ///
    /// # Errors
    /// Returns error if the method fails or a metric is unsupported
    fn evaluate(&self, method: &MethodDescriptor, dataset: &Dataset, metrics: &[String]) -> Result<Scores>;
}

/// Default evaluator: runs the method and scores its predictions against
/// the dataset targets.
///
/// - `accuracy`: fraction of predictions whose rounded value equals the
///   rounded target
/// - `mse`, `mae`, `rmse`: squared / absolute / root-squared error
/// - `r2`: coefficient of determination (NaN for constant targets)
///
/// An empty metric list evaluates [`DEFAULT_METRIC`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricEvaluator;

impl Evaluator for MetricEvaluator {
    fn evaluate(&self, method: &MethodDescriptor, dataset: &Dataset, metrics: &[String]) -> Result<Scores> {
        let predictions = method.predict(&dataset.features)?;
        if predictions.len() != dataset.targets.len() {
            return Err(Error::InvalidInput(format!(
                "Method '{}' returned {} predictions for {} samples",
                method.name,
                predictions.len(),
                dataset.targets.len()
            )));
        }

        let default = [DEFAULT_METRIC.to_string()];
        let requested = if metrics.is_empty() { &default[..] } else { metrics };

        requested
            .iter()
            .map(|metric| Ok((metric.clone(), score(metric, &predictions, &dataset.targets)?)))
            .collect()
    }
}

/// Compute a single named metric.
///
/// # Errors
/// Returns `Error::UnknownMetric` for a name outside [`SUPPORTED_METRICS`]
#[allow(clippy::cast_precision_loss)]
pub fn score(metric: &str, predictions: &[f64], targets: &[f64]) -> Result<f64> {
    let n = targets.len() as f64;
    if targets.is_empty() {
        return match metric {
            m if SUPPORTED_METRICS.contains(&m) => Ok(f64::NAN),
            other => Err(Error::UnknownMetric(other.to_string())),
        };
    }

    let pairs = || predictions.iter().zip(targets);
    let mse = || pairs().map(|(p, t)| (p - t).powi(2)).sum::<f64>() / n;

    match metric {
        "accuracy" => {
            let hits = pairs().filter(|(p, t)| p.round() == t.round()).count();
            Ok(hits as f64 / n)
        }
        "mse" => Ok(mse()),
        "rmse" => Ok(mse().sqrt()),
        "mae" => Ok(pairs().map(|(p, t)| (p - t).abs()).sum::<f64>() / n),
        "r2" => {
            let mean = targets.iter().sum::<f64>() / n;
            let ss_tot: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
            let ss_res: f64 = pairs().map(|(p, t)| (t - p).powi(2)).sum();
            Ok(if ss_tot == 0.0 { f64::NAN } else { 1.0 - ss_res / ss_tot })
        }
        other => Err(Error::UnknownMetric(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ConstantMethod, Parameters};
    use std::sync::Arc;

    fn constant(value: f64) -> MethodDescriptor {
        let mut params = Parameters::new();
        params.insert("value".into(), value.into());
        MethodDescriptor::new("const", Arc::new(ConstantMethod), params)
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![vec![0.0], vec![1.0], vec![2.0]], vec![1.0, 1.0, 4.0]).unwrap()
    }

    #[test]
    fn test_accuracy_and_errors() {
        let metrics: Vec<String> = ["accuracy", "mse", "mae"].iter().map(|s| (*s).to_string()).collect();
        let scores = MetricEvaluator.evaluate(&constant(1.0), &dataset(), &metrics).unwrap();
        assert!((scores["accuracy"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((scores["mse"] - 3.0).abs() < 1e-12);
        assert!((scores["mae"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_metrics_defaults_to_accuracy() {
        let scores = MetricEvaluator.evaluate(&constant(1.0), &dataset(), &[]).unwrap();
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["accuracy"]);
    }

    #[test]
    fn test_unknown_metric() {
        let err = MetricEvaluator
            .evaluate(&constant(1.0), &dataset(), &["bleu".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMetric(ref m) if m == "bleu"));
    }

    #[test]
    fn test_r2_perfect_fit() {
        let r2 = score("r2", &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_targets_is_nan() {
        assert!(score("r2", &[1.0, 1.0], &[2.0, 2.0]).unwrap().is_nan());
    }
}
