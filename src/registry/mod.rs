//! Dataset and method registries
//!
//! Registries are plain values owned by a [`Benchmark`](crate::runner::Benchmark),
//! so several benchmark configurations can coexist in one process.
//!
//! # Example
//!
//! ```rust
//! use benchkit::registry::{DatasetDescriptor, DatasetRegistry, MethodRegistry};
//!
//! # fn main() -> benchkit::Result<()> {
//! let datasets = DatasetRegistry::with_builtin();
//! let data = datasets.load(&DatasetDescriptor::new("linear"))?;
//! assert_eq!(data.len(), 100);
//!
//! let mut methods = MethodRegistry::new();
//! methods.register_kind("my_affine", "affine", serde_json::Map::new())?;
//! assert_eq!(methods.names(), vec!["my_affine"]);
//! # Ok(())
//! # }
//! ```

mod dataset;
mod method;

pub use dataset::{Dataset, DatasetDescriptor, DatasetLoader, DatasetRegistry, LinearLoader};
pub use method::{builtin_method, AffineMethod, ConstantMethod, Method, MethodDescriptor, MethodRegistry};

use crate::{Error, Result};

/// Free-form parameters for loaders and methods.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Read a numeric parameter, falling back to `default` when absent.
///
/// # Errors
/// Returns `Error::InvalidInput` if the key is present but not a number
pub fn param_f64(parameters: &Parameters, key: &str, default: f64) -> Result<f64> {
    match parameters.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| Error::InvalidInput(format!("Parameter '{key}' must be a number, got {value}"))),
    }
}

/// Read a non-negative integer parameter, falling back to `default` when absent.
///
/// # Errors
/// Returns `Error::InvalidInput` if the key is present but not a non-negative integer
pub fn param_usize(parameters: &Parameters, key: &str, default: usize) -> Result<usize> {
    match parameters.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Parameter '{key}' must be a non-negative integer, got {value}"
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> Parameters {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_param_defaults() {
        let p = Parameters::new();
        assert!((param_f64(&p, "x", 1.5).unwrap() - 1.5).abs() < f64::EPSILON);
        assert_eq!(param_usize(&p, "n", 7).unwrap(), 7);
    }

    #[test]
    fn test_param_integer_accepted_as_f64() {
        let p = params(json!({"x": 10}));
        assert!((param_f64(&p, "x", 0.0).unwrap() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_param_wrong_type() {
        let p = params(json!({"x": "ten", "n": -3}));
        assert!(matches!(param_f64(&p, "x", 0.0), Err(Error::InvalidInput(_))));
        assert!(matches!(param_usize(&p, "n", 0), Err(Error::InvalidInput(_))));
    }
}
