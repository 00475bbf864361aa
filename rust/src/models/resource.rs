//! The three resource kinds an activity can consume.
//!
//! Each kind has its own cost formula; the `Resource` trait gives the rest of
//! the engine one uniform view over all of them.

use pyo3::prelude::*;
use std::fmt;
use std::sync::Arc;

use crate::error::EngineError;

use super::supplier::Supplier;

/// Resource classification, also used as the cost breakdown category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Human,
    Material,
    Asset,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Human => f.write_str("human"),
            ResourceKind::Material => f.write_str("material"),
            ResourceKind::Asset => f.write_str("asset"),
        }
    }
}

/// Uniform view over human, material and asset resources.
pub trait Resource {
    fn kind(&self) -> ResourceKind;

    /// Role for humans, name for materials and assets.
    fn label(&self) -> &str;

    fn description(&self) -> &str;

    fn quantity(&self) -> f64;

    /// Hourly rate, unit cost or cost per use, depending on the kind.
    fn unit_rate(&self) -> f64;

    /// Cost of this resource on an activity lasting `activity_duration` minutes.
    fn cost(&self, activity_duration: i64) -> f64;

    fn supplier(&self) -> Option<&Arc<Supplier>>;

    fn supplier_mut(&mut self) -> &mut Option<Arc<Supplier>>;

    /// Check the resource's own fields and its supplier, reporting every
    /// problem found.
    fn validate(&self) -> Result<(), EngineError> {
        let mut errors = Vec::new();
        if self.unit_rate() < 0.0 {
            errors.push(EngineError::NegativeCost(format!(
                "{} resource '{}' has negative cost {}",
                self.kind(),
                self.label(),
                self.unit_rate()
            )));
        }
        if self.quantity() < 0.0 {
            errors.push(EngineError::NegativeQuantity(format!(
                "{} resource '{}' has negative quantity {}",
                self.kind(),
                self.label(),
                self.quantity()
            )));
        }
        if let Some(supplier) = self.supplier() {
            if let Err(err) = supplier.validate() {
                errors.extend(err.into_vec());
            }
        }
        EngineError::aggregate(errors)
    }
}

/// Labor billed by the hour for the whole duration of its activity.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct HumanResource {
    #[pyo3(get, set)]
    pub role: String,
    #[pyo3(get, set)]
    pub description: String,
    #[pyo3(get, set)]
    pub cost_per_h: f64,
    #[pyo3(get, set)]
    pub quantity: f64,
    pub supplier: Option<Arc<Supplier>>,
}

impl HumanResource {
    pub fn new(role: impl Into<String>, cost_per_h: f64, quantity: f64) -> Result<Self, EngineError> {
        let resource = Self {
            role: role.into(),
            description: String::new(),
            cost_per_h,
            quantity,
            supplier: None,
        };
        resource.validate()?;
        Ok(resource)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_supplier(mut self, supplier: Arc<Supplier>) -> Self {
        self.supplier = Some(supplier);
        self
    }
}

impl Resource for HumanResource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Human
    }

    fn label(&self) -> &str {
        &self.role
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit_rate(&self) -> f64 {
        self.cost_per_h
    }

    fn cost(&self, activity_duration: i64) -> f64 {
        (self.cost_per_h / 60.0) * activity_duration as f64 * self.quantity
    }

    fn supplier(&self) -> Option<&Arc<Supplier>> {
        self.supplier.as_ref()
    }

    fn supplier_mut(&mut self) -> &mut Option<Arc<Supplier>> {
        &mut self.supplier
    }
}

#[pymethods]
impl HumanResource {
    #[new]
    #[pyo3(signature = (role, cost_per_h, quantity=1.0, description=String::new(), supplier=None))]
    fn py_new(
        role: String,
        cost_per_h: f64,
        quantity: f64,
        description: String,
        supplier: Option<Supplier>,
    ) -> PyResult<Self> {
        let mut resource = Self::new(role, cost_per_h, quantity)?.with_description(description);
        resource.supplier = supplier.map(Arc::new);
        Ok(resource)
    }

    #[getter(supplier)]
    fn py_supplier(&self) -> Option<Supplier> {
        self.supplier.as_deref().cloned()
    }

    #[setter(supplier)]
    fn py_set_supplier(&mut self, supplier: Option<Supplier>) {
        self.supplier = supplier.map(Arc::new);
    }

    fn __repr__(&self) -> String {
        format!(
            "HumanResource(role={:?}, cost_per_h={}, quantity={})",
            self.role, self.cost_per_h, self.quantity
        )
    }
}

/// Consumable material priced per unit.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialResource {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub description: String,
    #[pyo3(get, set)]
    pub unit_cost: f64,
    #[pyo3(get, set)]
    pub quantity: f64,
    pub supplier: Option<Arc<Supplier>>,
}

impl MaterialResource {
    pub fn new(name: impl Into<String>, unit_cost: f64, quantity: f64) -> Result<Self, EngineError> {
        let resource = Self {
            name: name.into(),
            description: String::new(),
            unit_cost,
            quantity,
            supplier: None,
        };
        resource.validate()?;
        Ok(resource)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_supplier(mut self, supplier: Arc<Supplier>) -> Self {
        self.supplier = Some(supplier);
        self
    }
}

impl Resource for MaterialResource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Material
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit_rate(&self) -> f64 {
        self.unit_cost
    }

    fn cost(&self, _activity_duration: i64) -> f64 {
        self.unit_cost * self.quantity
    }

    fn supplier(&self) -> Option<&Arc<Supplier>> {
        self.supplier.as_ref()
    }

    fn supplier_mut(&mut self) -> &mut Option<Arc<Supplier>> {
        &mut self.supplier
    }
}

#[pymethods]
impl MaterialResource {
    #[new]
    #[pyo3(signature = (name, unit_cost, quantity=1.0, description=String::new(), supplier=None))]
    fn py_new(
        name: String,
        unit_cost: f64,
        quantity: f64,
        description: String,
        supplier: Option<Supplier>,
    ) -> PyResult<Self> {
        let mut resource = Self::new(name, unit_cost, quantity)?.with_description(description);
        resource.supplier = supplier.map(Arc::new);
        Ok(resource)
    }

    #[getter(supplier)]
    fn py_supplier(&self) -> Option<Supplier> {
        self.supplier.as_deref().cloned()
    }

    #[setter(supplier)]
    fn py_set_supplier(&mut self, supplier: Option<Supplier>) {
        self.supplier = supplier.map(Arc::new);
    }

    fn __repr__(&self) -> String {
        format!(
            "MaterialResource(name={:?}, unit_cost={}, quantity={})",
            self.name, self.unit_cost, self.quantity
        )
    }
}

/// Rented or owned equipment charged per use.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub description: String,
    #[pyo3(get, set)]
    pub cost_per_use: f64,
    #[pyo3(get, set)]
    pub quantity: f64,
    pub supplier: Option<Arc<Supplier>>,
}

impl Asset {
    pub fn new(name: impl Into<String>, cost_per_use: f64, quantity: f64) -> Result<Self, EngineError> {
        let resource = Self {
            name: name.into(),
            description: String::new(),
            cost_per_use,
            quantity,
            supplier: None,
        };
        resource.validate()?;
        Ok(resource)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_supplier(mut self, supplier: Arc<Supplier>) -> Self {
        self.supplier = Some(supplier);
        self
    }
}

impl Resource for Asset {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Asset
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit_rate(&self) -> f64 {
        self.cost_per_use
    }

    fn cost(&self, _activity_duration: i64) -> f64 {
        self.cost_per_use * self.quantity
    }

    fn supplier(&self) -> Option<&Arc<Supplier>> {
        self.supplier.as_ref()
    }

    fn supplier_mut(&mut self) -> &mut Option<Arc<Supplier>> {
        &mut self.supplier
    }
}

#[pymethods]
impl Asset {
    #[new]
    #[pyo3(signature = (name, cost_per_use, quantity=1.0, description=String::new(), supplier=None))]
    fn py_new(
        name: String,
        cost_per_use: f64,
        quantity: f64,
        description: String,
        supplier: Option<Supplier>,
    ) -> PyResult<Self> {
        let mut resource = Self::new(name, cost_per_use, quantity)?.with_description(description);
        resource.supplier = supplier.map(Arc::new);
        Ok(resource)
    }

    #[getter(supplier)]
    fn py_supplier(&self) -> Option<Supplier> {
        self.supplier.as_deref().cloned()
    }

    #[setter(supplier)]
    fn py_set_supplier(&mut self, supplier: Option<Supplier>) {
        self.supplier = supplier.map(Arc::new);
    }

    fn __repr__(&self) -> String {
        format!(
            "Asset(name={:?}, cost_per_use={}, quantity={})",
            self.name, self.cost_per_use, self.quantity
        )
    }
}
