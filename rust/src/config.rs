//! Configuration for the analysis engine.

use pyo3::prelude::*;
use std::str::FromStr;

use crate::error::EngineError;

/// How crash candidates are selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrashStrategy {
    /// Sort the critical activities once and take whole activities greedily.
    Static,
    /// Re-run CPM after every minute crashed and pick the cheapest activity
    /// that still shortens the project.
    Incremental,
}

impl FromStr for CrashStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(CrashStrategy::Static),
            "incremental" => Ok(CrashStrategy::Incremental),
            other => Err(EngineError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Settings shared by the crashing optimizer, supplier analysis and the
/// what-if engine.
#[pyclass]
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Verbosity level: 0=silent, 1=summary, 2=steps, 3=trace.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Crash strategy: "static" or "incremental"
    #[pyo3(get, set)]
    pub crash_strategy: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            crash_strategy: "static".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Parse the configured crash strategy.
    pub fn strategy(&self) -> Result<CrashStrategy, EngineError> {
        self.crash_strategy.parse()
    }
}

#[pymethods]
impl AnalysisConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, crash_strategy=None))]
    fn py_new(verbosity: Option<u8>, crash_strategy: Option<String>) -> PyResult<Self> {
        let defaults = Self::default();
        let config = Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            crash_strategy: crash_strategy.unwrap_or(defaults.crash_strategy),
        };
        config.strategy()?;
        Ok(config)
    }

    fn __repr__(&self) -> String {
        format!(
            "AnalysisConfig(verbosity={}, crash_strategy={:?})",
            self.verbosity, self.crash_strategy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.strategy(), Ok(CrashStrategy::Static));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(" Incremental ".parse(), Ok(CrashStrategy::Incremental));
        assert_eq!(
            "optimal".parse::<CrashStrategy>(),
            Err(EngineError::UnknownStrategy("optimal".to_string()))
        );
    }
}
