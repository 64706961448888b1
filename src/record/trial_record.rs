//! Trial Record - one metric value from one repeat of one method

/// Trial Record represents a single raw benchmark measurement.
///
/// `(method, repeat, metric)` is not unique across appends: a resumed run
/// adds new repeat indices after the existing maximum instead of replacing
/// earlier rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    method: String,
    repeat: u64,
    metric: String,
    value: f64,
}

impl TrialRecord {
    /// Create a new trial record.
    ///
    /// # Arguments
    ///
    /// * `method` - Name of the benchmarked method
    /// * `repeat` - Zero-based repeat index for this method
    /// * `metric` - Metric name (e.g., "accuracy")
    /// * `value` - Measured value
    #[must_use]
    pub fn new(method: impl Into<String>, repeat: u64, metric: impl Into<String>, value: f64) -> Self {
        Self {
            method: method.into(),
            repeat,
            metric: metric.into(),
            value,
        }
    }

    /// Get the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the repeat index.
    #[must_use]
    pub const fn repeat(&self) -> u64 {
        self.repeat
    }

    /// Get the metric name.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Get the measured value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}
