//! Method registry - the competitor methods of a benchmark

use super::{param_f64, Parameters};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// A benchmarked method: maps feature rows to one prediction per row.
pub trait Method: Send + Sync {
    /// Predict a value for every row of `features`.
    ///
    /// # Errors
    /// Returns error if the parameters are invalid for this method
    fn predict(&self, features: &[Vec<f64>], parameters: &Parameters) -> Result<Vec<f64>>;
}

/// `prediction = x[0] * param1 + param2` (defaults 10 and 0.5).
#[derive(Debug, Clone, Copy, Default)]
pub struct AffineMethod;

impl Method for AffineMethod {
    fn predict(&self, features: &[Vec<f64>], parameters: &Parameters) -> Result<Vec<f64>> {
        let scale = param_f64(parameters, "param1", 10.0)?;
        let shift = param_f64(parameters, "param2", 0.5)?;
        Ok(features
            .iter()
            .map(|row| row.first().copied().unwrap_or(0.0) * scale + shift)
            .collect())
    }
}

/// Predicts the constant `value` (default 0.0) for every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantMethod;

impl Method for ConstantMethod {
    fn predict(&self, features: &[Vec<f64>], parameters: &Parameters) -> Result<Vec<f64>> {
        let value = param_f64(parameters, "value", 0.0)?;
        Ok(vec![value; features.len()])
    }
}

/// Built-in method implementation for a configuration `kind`.
///
/// # Errors
/// Returns `Error::UnknownMethod` for an unrecognized kind
pub fn builtin_method(kind: &str) -> Result<Arc<dyn Method>> {
    match kind {
        "affine" => Ok(Arc::new(AffineMethod)),
        "constant" => Ok(Arc::new(ConstantMethod)),
        other => Err(Error::UnknownMethod(other.to_string())),
    }
}

/// A named method with its parameters.
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Name used in result tables
    pub name: String,
    /// Implementation
    pub function: Arc<dyn Method>,
    /// Parameters passed on every call
    pub parameters: Parameters,
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl MethodDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, function: Arc<dyn Method>, parameters: Parameters) -> Self {
        Self {
            name: name.into(),
            function,
            parameters,
        }
    }

    /// Run the method on `features` with its own parameters.
    ///
    /// # Errors
    /// Propagates the method's error
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        self.function.predict(features, &self.parameters)
    }
}

/// Ordered list of methods. Runs and exports follow registration order.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: Vec<MethodDescriptor>,
}

impl MethodRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if a method with the same name exists
    pub fn register(&mut self, descriptor: MethodDescriptor) -> Result<()> {
        if self.get(&descriptor.name).is_some() {
            return Err(Error::InvalidInput(format!(
                "Method '{}' is registered twice",
                descriptor.name
            )));
        }
        self.methods.push(descriptor);
        Ok(())
    }

    /// Add a built-in method by kind.
    ///
    /// # Errors
    /// Returns `Error::UnknownMethod` for an unknown kind, or
    /// `Error::InvalidInput` for a duplicate name
    pub fn register_kind(
        &mut self,
        name: impl Into<String>,
        kind: &str,
        parameters: Parameters,
    ) -> Result<()> {
        self.register(MethodDescriptor::new(name, builtin_method(kind)?, parameters))
    }

    /// Look up a method by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Method names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }

    /// Iterate over methods in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter()
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
