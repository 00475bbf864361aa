//! Suppliers and their capacity periods.

use chrono::Duration;
use pyo3::prelude::*;
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::EngineError;

use super::activity::Activity;

/// The period a supplier's capacity figure refers to.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::Minute,
        Period::Hour,
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Year,
    ];

    /// Length of the period. Months are 30 days and years 365 days.
    pub fn as_duration(self) -> Duration {
        match self {
            Period::Minute => Duration::minutes(1),
            Period::Hour => Duration::hours(1),
            Period::Day => Duration::days(1),
            Period::Week => Duration::weeks(1),
            Period::Month => Duration::days(30),
            Period::Year => Duration::days(365),
        }
    }

    #[inline]
    pub fn minutes(self) -> i64 {
        self.as_duration().num_minutes()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Minute => "minute",
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| EngineError::InvalidPeriod(s.to_string()))
    }
}

/// Minutes in a named period, or 0 when the name is not a known period.
pub fn period_minutes(name: &str) -> i64 {
    name.parse::<Period>().map(Period::minutes).unwrap_or(0)
}

/// A capacity-limited source for resources.
///
/// Resources hold suppliers behind an `Arc`: several resources may point at
/// the same supplier, and the supplier is never owned by any of them.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Supplier {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub description: String,
    #[pyo3(get, set)]
    pub unit_cost: f64,
    /// Quantity the supplier can deliver per `period`.
    #[pyo3(get, set)]
    pub available_quantity: f64,
    #[pyo3(get, set)]
    pub period: Period,
}

impl Supplier {
    /// Create a supplier, rejecting negative figures and empty names.
    pub fn new(
        name: impl Into<String>,
        unit_cost: f64,
        available_quantity: f64,
        period: Period,
    ) -> Result<Self, EngineError> {
        let supplier = Self {
            name: name.into(),
            description: String::new(),
            unit_cost,
            available_quantity,
            period,
        };
        supplier.validate()?;
        Ok(supplier)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the supplier's own fields, reporting every problem found.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(EngineError::InvalidSupplier(
                "supplier name is empty".to_string(),
            ));
        }
        if self.unit_cost < 0.0 {
            errors.push(EngineError::InvalidSupplier(format!(
                "supplier '{}' has negative unit cost {}",
                self.name, self.unit_cost
            )));
        }
        if self.available_quantity < 0.0 {
            errors.push(EngineError::InvalidSupplier(format!(
                "supplier '{}' has negative available quantity {}",
                self.name, self.available_quantity
            )));
        }
        EngineError::aggregate(errors)
    }

    /// Capacity rescaled from the supplier's own period to `period`.
    pub fn capacity_for_period(&self, period: Period) -> f64 {
        self.available_quantity * (period.minutes() as f64 / self.period.minutes() as f64)
    }

    pub fn daily_capacity(&self) -> f64 {
        self.capacity_for_period(Period::Day)
    }
}

#[pymethods]
impl Supplier {
    #[new]
    #[pyo3(signature = (name, available_quantity, period, unit_cost=0.0, description=String::new()))]
    fn py_new(
        name: String,
        available_quantity: f64,
        period: Period,
        unit_cost: f64,
        description: String,
    ) -> PyResult<Self> {
        Ok(Self::new(name, unit_cost, available_quantity, period)?.with_description(description))
    }

    #[pyo3(name = "capacity_for_period")]
    fn py_capacity_for_period(&self, period: Period) -> f64 {
        self.capacity_for_period(period)
    }

    #[pyo3(name = "daily_capacity")]
    fn py_daily_capacity(&self) -> f64 {
        self.daily_capacity()
    }

    fn __repr__(&self) -> String {
        format!(
            "Supplier(name={:?}, available_quantity={}, period={})",
            self.name, self.available_quantity, self.period
        )
    }
}

/// Name-keyed registry of shared suppliers.
///
/// A persisted tree stores suppliers by name only. Relinking through a
/// directory gives every resource that names the same supplier one shared
/// instance instead of a private copy each. Two distinct suppliers with the
/// same name cannot be told apart.
#[derive(Debug, Clone, Default)]
pub struct SupplierDirectory {
    by_name: FxHashMap<String, Arc<Supplier>>,
}

impl SupplierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the suppliers referenced by a tree. The first supplier seen
    /// for a name wins.
    pub fn from_tree(root: &Activity) -> Self {
        let mut directory = Self::new();
        crate::tree::for_each_resource(root, |_, resource| {
            if let Some(supplier) = resource.supplier() {
                directory
                    .by_name
                    .entry(supplier.name.clone())
                    .or_insert_with(|| Arc::clone(supplier));
            }
        });
        directory
    }

    /// Register a supplier and return the canonical shared instance for its
    /// name. An already registered name keeps its existing instance.
    pub fn register(&mut self, supplier: Supplier) -> Arc<Supplier> {
        Arc::clone(
            self.by_name
                .entry(supplier.name.clone())
                .or_insert_with(|| Arc::new(supplier)),
        )
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Arc<Supplier>> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Point every resource in the tree at the directory's instance for its
    /// supplier name. Resources naming an unknown supplier keep their link.
    ///
    /// Returns the number of resources relinked.
    pub fn relink(&self, root: &mut Activity) -> usize {
        let mut relinked = 0;
        crate::tree::walk_mut(root, |activity| {
            for resource in activity.resources_mut() {
                let slot = resource.supplier_mut();
                let canonical = slot
                    .as_ref()
                    .and_then(|current| self.by_name.get(&current.name));
                if let Some(canonical) = canonical {
                    *slot = Some(Arc::clone(canonical));
                    relinked += 1;
                }
            }
        });
        relinked
    }
}
