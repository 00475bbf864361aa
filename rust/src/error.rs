//! Error types shared by every analysis in the engine.

use pyo3::exceptions::PyValueError;
use pyo3::PyErr;
use thiserror::Error;

/// Errors reported by validation and by fail-fast constructors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Negative quantity: {0}")]
    NegativeQuantity(String),
    #[error("Negative cost: {0}")]
    NegativeCost(String),
    #[error("Invalid activity: {0}")]
    InvalidActivity(String),
    #[error("Invalid supplier: {0}")]
    InvalidSupplier(String),
    #[error("Unknown crash strategy: {0}")]
    UnknownStrategy(String),
    #[error("{}", format_multiple(.0))]
    Multiple(Vec<EngineError>),
}

fn format_multiple(errors: &[EngineError]) -> String {
    let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    format!("{} errors occurred: {}", errors.len(), joined.join("; "))
}

impl EngineError {
    /// Fold a list of findings into a single result.
    ///
    /// No findings is `Ok`, a single finding is returned as-is, and anything
    /// more is wrapped in `Multiple`.
    pub fn aggregate(mut errors: Vec<EngineError>) -> Result<(), EngineError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(EngineError::Multiple(errors)),
        }
    }

    /// Number of individual findings carried by this error.
    pub fn count(&self) -> usize {
        match self {
            EngineError::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }

    /// Flatten into the individual findings.
    pub fn into_vec(self) -> Vec<EngineError> {
        match self {
            EngineError::Multiple(errors) => errors,
            other => vec![other],
        }
    }
}

impl From<EngineError> for PyErr {
    fn from(err: EngineError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty_is_ok() {
        assert_eq!(EngineError::aggregate(vec![]), Ok(()));
    }

    #[test]
    fn test_aggregate_single_is_unwrapped() {
        let err = EngineError::aggregate(vec![EngineError::NegativeCost("x".to_string())]);
        assert_eq!(err, Err(EngineError::NegativeCost("x".to_string())));
    }

    #[test]
    fn test_aggregate_multiple_reports_count() {
        let err = EngineError::aggregate(vec![
            EngineError::NegativeCost("a".to_string()),
            EngineError::NegativeQuantity("b".to_string()),
        ])
        .unwrap_err();

        assert_eq!(err.count(), 2);
        let message = err.to_string();
        assert!(message.starts_with("2 errors occurred"));
        assert!(message.contains("Negative cost: a"));
        assert!(message.contains("Negative quantity: b"));
    }
}
