//! Configuration errors, raised before any input is read.

use thiserror::Error;

/// A run configuration that cannot be executed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Cutoff identifier is not one of the supported presets.
    #[error("unknown cutoff '{given}': choose one of {supported}")]
    UnknownCutoff {
        /// Identifier as supplied
        given: String,
        /// Comma-separated list of accepted identifiers
        supported: String,
    },

    /// A size knob that must be at least 1 was zero.
    #[error("{name} must be a positive integer, got {value}")]
    NonPositive {
        /// Option name as shown to the user
        name: &'static str,
        /// Offending value
        value: usize,
    },

    /// Contamination threshold outside the confidence range.
    #[error("contamination threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),
}

impl ConfigError {
    /// Create a NonPositive error.
    pub fn non_positive(name: &'static str, value: usize) -> Self {
        Self::NonPositive { name, value }
    }
}
