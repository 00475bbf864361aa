//! Scenario definitions and results.

use pyo3::prelude::*;
use std::collections::HashMap;

// Note: We use std HashMap here for PyO3 interface compatibility

/// Field and cost overrides for one activity.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityOverride {
    #[pyo3(get, set)]
    pub duration: Option<i64>,
    #[pyo3(get, set)]
    pub min_duration: Option<i64>,
    #[pyo3(get, set)]
    pub crash_cost_step: Option<f64>,
    /// Multiplies every human resource's hourly rate.
    #[pyo3(get, set)]
    pub human_cost_factor: f64,
    /// Multiplies every material's unit cost.
    #[pyo3(get, set)]
    pub material_cost_factor: f64,
    /// Multiplies every asset's cost per use.
    #[pyo3(get, set)]
    pub asset_cost_factor: f64,
}

impl Default for ActivityOverride {
    fn default() -> Self {
        Self {
            duration: None,
            min_duration: None,
            crash_cost_step: None,
            human_cost_factor: 1.0,
            material_cost_factor: 1.0,
            asset_cost_factor: 1.0,
        }
    }
}

impl ActivityOverride {
    pub fn duration(duration: i64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn cost_factors(human: f64, material: f64, asset: f64) -> Self {
        Self {
            human_cost_factor: human,
            material_cost_factor: material,
            asset_cost_factor: asset,
            ..Self::default()
        }
    }
}

#[pymethods]
impl ActivityOverride {
    #[new]
    #[pyo3(signature = (
        duration=None,
        min_duration=None,
        crash_cost_step=None,
        human_cost_factor=1.0,
        material_cost_factor=1.0,
        asset_cost_factor=1.0
    ))]
    fn py_new(
        duration: Option<i64>,
        min_duration: Option<i64>,
        crash_cost_step: Option<f64>,
        human_cost_factor: f64,
        material_cost_factor: f64,
        asset_cost_factor: f64,
    ) -> Self {
        Self {
            duration,
            min_duration,
            crash_cost_step,
            human_cost_factor,
            material_cost_factor,
            asset_cost_factor,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ActivityOverride(duration={:?}, min_duration={:?}, crash_cost_step={:?})",
            self.duration, self.min_duration, self.crash_cost_step
        )
    }
}

/// A named set of overrides evaluated against a copy of the base tree.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scenario {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub description: String,
    #[pyo3(get, set)]
    pub sell_price: f64,
    /// Overrides keyed by activity ID.
    #[pyo3(get, set)]
    pub overrides: HashMap<String, ActivityOverride>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, sell_price: f64) -> Self {
        Self {
            name: name.into(),
            sell_price,
            ..Self::default()
        }
    }

    pub fn with_override(mut self, activity_id: impl Into<String>, ovr: ActivityOverride) -> Self {
        self.overrides.insert(activity_id.into(), ovr);
        self
    }
}

#[pymethods]
impl Scenario {
    #[new]
    #[pyo3(signature = (name, sell_price=0.0, description=String::new(), overrides=None))]
    fn py_new(
        name: String,
        sell_price: f64,
        description: String,
        overrides: Option<HashMap<String, ActivityOverride>>,
    ) -> Self {
        Self {
            name,
            description,
            sell_price,
            overrides: overrides.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Scenario(name={:?}, sell_price={}, overrides={})",
            self.name,
            self.sell_price,
            self.overrides.len()
        )
    }
}

/// Flat summary of one evaluated scenario.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioResult {
    #[pyo3(get)]
    pub scenario_name: String,
    #[pyo3(get)]
    pub total_duration: i64,
    #[pyo3(get)]
    pub total_cost: f64,
    #[pyo3(get)]
    pub sell_price: f64,
    #[pyo3(get)]
    pub margin: f64,
    #[pyo3(get)]
    pub markup: f64,
    #[pyo3(get)]
    pub is_viable: bool,
    /// Number of zero-slack activities.
    #[pyo3(get)]
    pub critical_path_len: usize,
    #[pyo3(get)]
    pub max_crash_time: i64,
    #[pyo3(get)]
    pub max_crash_cost: f64,
}

#[pymethods]
impl ScenarioResult {
    fn __repr__(&self) -> String {
        format!(
            "ScenarioResult(scenario_name={:?}, total_duration={}, total_cost={}, margin={})",
            self.scenario_name, self.total_duration, self.total_cost, self.margin
        )
    }
}

/// Which scenarios stand out in a batch. Ties go to the earlier scenario.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioComparison {
    #[pyo3(get)]
    pub cheapest: String,
    #[pyo3(get)]
    pub fastest: String,
    #[pyo3(get)]
    pub best_margin: String,
}

#[pymethods]
impl ScenarioComparison {
    fn __repr__(&self) -> String {
        format!(
            "ScenarioComparison(cheapest={:?}, fastest={:?}, best_margin={:?})",
            self.cheapest, self.fastest, self.best_margin
        )
    }
}
