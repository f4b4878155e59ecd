//! Error types for the caffeine_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for caffeine_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid numeric input (dose, duration, half-life, weight, profile ranges)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed or out-of-range `HH:mm` time string
    #[error("Time format error: {0}")]
    TimeFormat(String),

    /// A sampler stopping condition failed to trigger within its horizon
    #[error("Internal invariant violated: {0}")]
    Invariant(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// True for errors caused by caller-supplied input that should be fixed and resubmitted.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::TimeFormat(_))
    }
}

/// Fail with a validation error unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("dose_mg", 95.0).is_ok());
        assert!(ensure_positive("dose_mg", 0.0).is_err());
        assert!(ensure_positive("dose_mg", -1.0).is_err());
        assert!(ensure_positive("dose_mg", f64::NAN).is_err());
        assert!(ensure_positive("dose_mg", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::Validation("x".into()).is_validation());
        assert!(Error::TimeFormat("x".into()).is_validation());
        assert!(!Error::Invariant("x".into()).is_validation());
        assert!(!Error::Config("x".into()).is_validation());
    }

    #[test]
    fn test_message_names_field() {
        let err = ensure_positive("half_life_hrs", 0.0).unwrap_err();
        assert!(err.to_string().contains("half_life_hrs must be positive"));
    }
}
