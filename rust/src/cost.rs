//! Cost rollups and financial metrics.
//!
//! Costs are a pure function of the tree; no CPM run is needed.

use pyo3::prelude::*;

use crate::models::{Activity, ResourceKind};

/// Cost totals per resource kind.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostBreakdown {
    #[pyo3(get)]
    pub human: f64,
    #[pyo3(get)]
    pub material: f64,
    #[pyo3(get)]
    pub asset: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.human + self.material + self.asset
    }

    fn add(&mut self, kind: ResourceKind, amount: f64) {
        match kind {
            ResourceKind::Human => self.human += amount,
            ResourceKind::Material => self.material += amount,
            ResourceKind::Asset => self.asset += amount,
        }
    }
}

#[pymethods]
impl CostBreakdown {
    #[pyo3(name = "total")]
    fn py_total(&self) -> f64 {
        self.total()
    }

    fn __repr__(&self) -> String {
        format!(
            "CostBreakdown(human={}, material={}, asset={})",
            self.human, self.material, self.asset
        )
    }
}

/// Margin and markup at a given sell price.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Financials {
    #[pyo3(get)]
    pub sell_price: f64,
    #[pyo3(get)]
    pub total_cost: f64,
    #[pyo3(get)]
    pub margin: f64,
    /// Margin as a percentage of cost; 0 when the cost is 0.
    #[pyo3(get)]
    pub markup: f64,
    #[pyo3(get)]
    pub is_viable: bool,
}

#[pymethods]
impl Financials {
    fn __repr__(&self) -> String {
        format!(
            "Financials(sell_price={}, total_cost={}, margin={}, markup={:.2}%)",
            self.sell_price, self.total_cost, self.margin, self.markup
        )
    }
}

/// Cost of the activity's own resources, excluding sub-activities.
pub fn direct_cost(activity: &Activity) -> f64 {
    activity
        .resources()
        .map(|r| r.cost(activity.duration))
        .sum()
}

/// Cost of the activity's resources plus everything below it.
pub fn total_cost(activity: &Activity) -> f64 {
    direct_cost(activity) + activity.sub_activities.iter().map(total_cost).sum::<f64>()
}

pub fn cost_breakdown(activity: &Activity) -> CostBreakdown {
    let mut breakdown = CostBreakdown::default();
    crate::tree::for_each_resource(activity, |owner, resource| {
        breakdown.add(resource.kind(), resource.cost(owner.duration));
    });
    breakdown
}

pub fn financials(root: &Activity, sell_price: f64) -> Financials {
    financials_for_cost(total_cost(root), sell_price)
}

pub(crate) fn financials_for_cost(total_cost: f64, sell_price: f64) -> Financials {
    let margin = sell_price - total_cost;
    let markup = if total_cost == 0.0 {
        0.0
    } else {
        (margin / total_cost) * 100.0
    };
    Financials {
        sell_price,
        total_cost,
        margin,
        markup,
        is_viable: margin > 0.0,
    }
}

/// The sell price at which the margin is exactly zero.
pub fn break_even_price(root: &Activity) -> f64 {
    total_cost(root)
}

/// `financials` for each candidate price, in the given order.
pub fn financials_for_prices(root: &Activity, prices: &[f64]) -> Vec<Financials> {
    let cost = total_cost(root);
    prices
        .iter()
        .map(|&price| financials_for_cost(cost, price))
        .collect()
}
