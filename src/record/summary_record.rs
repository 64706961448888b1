//! Summary Record - aggregated statistics for one (method, metric) pair

/// Summary Record is one row of a formatted table.
///
/// `std` is `None` when fewer than two repeats were recorded: the sample
/// standard deviation (n - 1 denominator) is undefined there.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    method: String,
    metric: String,
    repeat_count: u64,
    mean: f64,
    std: Option<f64>,
}

impl SummaryRecord {
    /// Create a new summary record.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        metric: impl Into<String>,
        repeat_count: u64,
        mean: f64,
        std: Option<f64>,
    ) -> Self {
        Self {
            method: method.into(),
            metric: metric.into(),
            repeat_count,
            mean,
            std,
        }
    }

    /// Get the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the metric name.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Number of raw records aggregated into this row.
    #[must_use]
    pub const fn repeat_count(&self) -> u64 {
        self.repeat_count
    }

    /// Mean value across repeats.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation, if at least two repeats exist.
    #[must_use]
    pub const fn std(&self) -> Option<f64> {
        self.std
    }
}
