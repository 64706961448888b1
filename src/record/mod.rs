//! Result records
//!
//! ## Schema Overview
//!
//! ```text
//! TrialRecord (raw, append-only)  ──group by (method, metric)──>  SummaryRecord
//!   method | repeat | metric | value      method | metric | repeat_tol | mean_val | std_val
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use benchkit::record::{SummaryRecord, TrialRecord};
//!
//! let trial = TrialRecord::new("my_method", 0, "accuracy", 0.9);
//! assert_eq!(trial.repeat(), 0);
//!
//! let summary = SummaryRecord::new("my_method", "accuracy", 1, 0.9, None);
//! assert!(summary.std().is_none());
//! ```

mod summary_record;
mod trial_record;

pub use summary_record::SummaryRecord;
pub use trial_record::TrialRecord;

use std::collections::BTreeMap;

/// Scores produced by one repeat: metric name to value.
pub type Scores = BTreeMap<String, f64>;
