//! Supplier capacity analysis.
//!
//! Demand is expressed per unit produced: a resource with quantity 10 under a
//! production target of 50 units per `target_period` needs 500 per period.
//! Demand is converted into each supplier's own period before being compared
//! with what the supplier can deliver.

use pyo3::prelude::*;

use crate::config::AnalysisConfig;
use crate::error::EngineError;
use crate::interner::NameInterner;
use crate::models::{Activity, Period};
use crate::tree::for_each_resource;
use crate::{log_steps, log_summary};

/// Aggregate demand on one supplier.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct SupplierRequirement {
    #[pyo3(get)]
    pub supplier_name: String,
    /// The supplier's own period; `required_quantity` is expressed in it.
    #[pyo3(get)]
    pub period: Period,
    #[pyo3(get)]
    pub required_quantity: f64,
    #[pyo3(get)]
    pub available_quantity: f64,
    /// How many suppliers of this capacity the demand needs (fractional).
    /// Infinite when the supplier has no capacity but demand exists.
    #[pyo3(get)]
    pub suppliers_needed: f64,
    #[pyo3(get)]
    pub is_feasible: bool,
}

impl SupplierRequirement {
    /// Whole suppliers to procure.
    pub fn procurement_count(&self) -> Option<u64> {
        if self.suppliers_needed.is_finite() {
            Some(self.suppliers_needed.ceil() as u64)
        } else {
            None
        }
    }
}

#[pymethods]
impl SupplierRequirement {
    #[pyo3(name = "procurement_count")]
    fn py_procurement_count(&self) -> Option<u64> {
        self.procurement_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "SupplierRequirement(supplier_name={:?}, required_quantity={}, period={}, suppliers_needed={})",
            self.supplier_name, self.required_quantity, self.period, self.suppliers_needed
        )
    }
}

/// Total demand per supplier for producing `production_target` units per
/// `target_period`, in order of first appearance in the tree.
///
/// Suppliers are grouped by name; capacity is taken from the first supplier
/// seen under each name.
pub fn calculate_supplier_requirements(
    root: &Activity,
    production_target: f64,
    target_period: Period,
    config: &AnalysisConfig,
) -> Vec<SupplierRequirement> {
    let verbosity = config.verbosity;
    let mut names = NameInterner::default();
    let mut requirements: Vec<SupplierRequirement> = Vec::new();
    let target_minutes = target_period.minutes() as f64;

    for_each_resource(root, |activity, resource| {
        let Some(supplier) = resource.supplier() else {
            return;
        };

        let total_quantity = resource.quantity() * production_target;
        let in_supplier_period =
            total_quantity * (supplier.period.minutes() as f64 / target_minutes);

        let (slot, is_new) = names.intern(&supplier.name);
        if is_new {
            requirements.push(SupplierRequirement {
                supplier_name: supplier.name.clone(),
                period: supplier.period,
                required_quantity: 0.0,
                available_quantity: supplier.available_quantity,
                suppliers_needed: 0.0,
                is_feasible: supplier.available_quantity > 0.0,
            });
        }
        requirements[slot].required_quantity += in_supplier_period;

        log_steps!(
            verbosity,
            "{} / {}: {} per {} from '{}'",
            activity.id,
            resource.label(),
            in_supplier_period,
            supplier.period,
            supplier.name
        );
    });

    for requirement in &mut requirements {
        requirement.suppliers_needed = if requirement.available_quantity > 0.0 {
            requirement.required_quantity / requirement.available_quantity
        } else if requirement.required_quantity > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
        log_summary!(
            verbosity,
            "supplier '{}': need {} per {}, {} available ({} suppliers)",
            requirement.supplier_name,
            requirement.required_quantity,
            requirement.period,
            requirement.available_quantity,
            requirement.suppliers_needed
        );
    }

    requirements
}

/// Flag every resource whose quantity exceeds its supplier's stated capacity.
///
/// Quantities are compared as-is, with no period conversion. All findings are
/// reported together.
pub fn validate_supplier_usage(root: &Activity) -> Result<(), EngineError> {
    let mut errors = Vec::new();
    for_each_resource(root, |activity, resource| {
        let Some(supplier) = resource.supplier() else {
            return;
        };
        if resource.quantity() > supplier.available_quantity {
            errors.push(EngineError::InvalidSupplier(format!(
                "activity '{}' ({}): {} resource '{}' uses {} but supplier '{}' provides {} per {} (short by {})",
                activity.id,
                activity.name,
                resource.kind(),
                resource.label(),
                resource.quantity(),
                supplier.name,
                supplier.available_quantity,
                supplier.period,
                resource.quantity() - supplier.available_quantity
            )));
        }
    });
    EngineError::aggregate(errors)
}
