//! Display names for methods and datasets in exported tables

use std::collections::HashMap;

/// Alternative display names for methods and datasets.
///
/// Unmapped names fall back to [`title_case`]: `"my_method"` becomes
/// `"My Method"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayNames {
    methods: HashMap<String, String>,
    datasets: HashMap<String, String>,
}

impl DisplayNames {
    /// No mappings: every name uses the title-case fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from method and dataset mappings.
    #[must_use]
    pub const fn from_maps(
        methods: HashMap<String, String>,
        datasets: HashMap<String, String>,
    ) -> Self {
        Self { methods, datasets }
    }

    /// Map a method name to a display name.
    #[must_use]
    pub fn with_method(mut self, name: impl Into<String>, display: impl Into<String>) -> Self {
        self.methods.insert(name.into(), display.into());
        self
    }

    /// Map a dataset name to a display name.
    #[must_use]
    pub fn with_dataset(mut self, name: impl Into<String>, display: impl Into<String>) -> Self {
        self.datasets.insert(name.into(), display.into());
        self
    }

    /// Display name for a method.
    #[must_use]
    pub fn method(&self, name: &str) -> String {
        self.methods
            .get(name)
            .cloned()
            .unwrap_or_else(|| title_case(name))
    }

    /// Display name for a dataset.
    #[must_use]
    pub fn dataset(&self, name: &str) -> String {
        self.datasets
            .get(name)
            .cloned()
            .unwrap_or_else(|| title_case(name))
    }
}

/// Capitalize each word and turn underscores into spaces.
///
/// A word starts at any letter not preceded by another letter; all other
/// letters are lowercased. `"resnet50_v2"` becomes `"Resnet50 V2"`.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_cased = false;
    for c in name.chars() {
        if c == '_' {
            out.push(' ');
        } else if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_alphabetic();
    }
    out
}
