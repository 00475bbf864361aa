//! The project: an optional root activity plus the analyses that must cope
//! with it being absent.

use pyo3::prelude::*;

use crate::config::AnalysisConfig;
use crate::cost::{self, CostBreakdown, Financials};
use crate::cpm::{self, CpmSummary};
use crate::error::EngineError;
use crate::models::{Activity, Period};
use crate::scenario::clone_activity;
use crate::supplier_analysis::{calculate_supplier_requirements, SupplierRequirement};
use crate::validation;

#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct Project {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub root: Option<Activity>,
}

impl Project {
    pub fn new(name: impl Into<String>, root: Option<Activity>) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// Run CPM on the root, if there is one.
    pub fn compute_cpm(&mut self) {
        if let Some(root) = self.root.as_mut() {
            cpm::compute_cpm(root);
        }
    }

    pub fn total_duration(&self) -> i64 {
        self.root.as_ref().map_or(0, cpm::total_duration)
    }

    pub fn critical_path(&self) -> Vec<&Activity> {
        self.root.as_ref().map(cpm::critical_path).unwrap_or_default()
    }

    pub fn cpm_summary(&self) -> CpmSummary {
        self.root
            .as_ref()
            .map(cpm::cpm_summary)
            .unwrap_or_default()
    }

    pub fn total_cost(&self) -> f64 {
        self.root.as_ref().map_or(0.0, cost::total_cost)
    }

    pub fn cost_breakdown(&self) -> CostBreakdown {
        self.root
            .as_ref()
            .map(cost::cost_breakdown)
            .unwrap_or_default()
    }

    pub fn financials(&self, sell_price: f64) -> Financials {
        cost::financials_for_cost(self.total_cost(), sell_price)
    }

    pub fn break_even_price(&self) -> f64 {
        self.root.as_ref().map_or(0.0, cost::break_even_price)
    }

    /// `None` when there is no root.
    pub fn supplier_requirements(
        &self,
        production_target: f64,
        target_period: Period,
        config: &AnalysisConfig,
    ) -> Option<Vec<SupplierRequirement>> {
        self.root.as_ref().map(|root| {
            calculate_supplier_requirements(root, production_target, target_period, config)
        })
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        match self.root.as_ref() {
            Some(root) => validation::validate(root),
            None => Err(EngineError::InvalidActivity(
                "project has no root activity".to_string(),
            )),
        }
    }

    /// Alias-free copy of the root.
    pub fn clone_root(&self) -> Option<Activity> {
        self.root.as_ref().map(clone_activity)
    }
}

#[pymethods]
impl Project {
    #[new]
    #[pyo3(signature = (name, root=None))]
    fn py_new(name: String, root: Option<Activity>) -> Self {
        Self::new(name, root)
    }

    #[pyo3(name = "compute_cpm")]
    fn py_compute_cpm(&mut self) {
        self.compute_cpm();
    }

    #[pyo3(name = "total_duration")]
    fn py_total_duration(&self) -> i64 {
        self.total_duration()
    }

    #[pyo3(name = "critical_path")]
    fn py_critical_path(&self) -> Vec<Activity> {
        self.critical_path().into_iter().cloned().collect()
    }

    #[pyo3(name = "total_cost")]
    fn py_total_cost(&self) -> f64 {
        self.total_cost()
    }

    #[pyo3(name = "financials")]
    fn py_financials(&self, sell_price: f64) -> Financials {
        self.financials(sell_price)
    }

    #[pyo3(name = "break_even_price")]
    fn py_break_even_price(&self) -> f64 {
        self.break_even_price()
    }

    #[pyo3(name = "supplier_requirements")]
    #[pyo3(signature = (production_target, target_period, config=None))]
    fn py_supplier_requirements(
        &self,
        production_target: f64,
        target_period: &str,
        config: Option<AnalysisConfig>,
    ) -> PyResult<Option<Vec<SupplierRequirement>>> {
        let period: Period = target_period.parse()?;
        let config = config.unwrap_or_default();
        Ok(self.supplier_requirements(production_target, period, &config))
    }

    #[pyo3(name = "validate")]
    fn py_validate(&self) -> PyResult<()> {
        Ok(self.validate()?)
    }

    fn __repr__(&self) -> String {
        format!(
            "Project(name={:?}, root={:?})",
            self.name,
            self.root.as_ref().map(|r| r.id.as_str())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaterialResource, Supplier};
    use std::sync::Arc;

    fn empty() -> Project {
        Project::new("empty", None)
    }

    fn small() -> Project {
        let supplier = Arc::new(Supplier::new("mill", 2.0, 1000.0, Period::Day).unwrap());
        let root = Activity::new("1", "assemble", 30).with_sub_activity(
            Activity::new("2", "cut", 20).with_material(
                MaterialResource::new("board", 4.0, 10.0)
                    .unwrap()
                    .with_supplier(supplier),
            ),
        );
        let mut project = Project::new("small", Some(root));
        project.compute_cpm();
        project
    }

    #[test]
    fn test_empty_project_defaults() {
        let mut project = empty();
        project.compute_cpm();
        assert_eq!(project.total_duration(), 0);
        assert!(project.critical_path().is_empty());
        assert_eq!(project.cpm_summary().activity_count, 0);
        assert_eq!(project.total_cost(), 0.0);
        assert_eq!(project.cost_breakdown(), CostBreakdown::default());
        assert_eq!(project.break_even_price(), 0.0);
        assert!(project.clone_root().is_none());
        assert!(project
            .supplier_requirements(10.0, Period::Day, &AnalysisConfig::default())
            .is_none());
    }

    #[test]
    fn test_empty_project_fails_validation() {
        assert!(matches!(
            empty().validate(),
            Err(EngineError::InvalidActivity(_))
        ));
    }

    #[test]
    fn test_empty_project_financials() {
        let f = empty().financials(100.0);
        assert_eq!(f.total_cost, 0.0);
        assert_eq!(f.markup, 0.0);
        assert!(f.is_viable);
    }

    #[test]
    fn test_project_delegates_to_root() {
        let project = small();
        assert_eq!(project.total_duration(), 50);
        assert_eq!(project.critical_path().len(), 2);
        assert!((project.total_cost() - 40.0).abs() < 1e-9);
        assert!((project.break_even_price() - 40.0).abs() < 1e-9);
        assert!(project.validate().is_ok());

        let requirements = project
            .supplier_requirements(5.0, Period::Day, &AnalysisConfig::default())
            .unwrap();
        assert_eq!(requirements.len(), 1);
        assert!((requirements[0].required_quantity - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_clone_root_is_independent() {
        let project = small();
        let mut copy = project.clone_root().unwrap();
        copy.duration = 1;
        assert_eq!(project.root.as_ref().unwrap().duration, 30);
    }
}
