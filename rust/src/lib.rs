//! Rust implementation of the Planwright analysis engine.
//!
//! A project is a tree of activities. This crate derives its schedule (CPM),
//! cost and margin, crash options, supplier feasibility and what-if
//! scenarios, and exposes all of it to Python as `planwright.rust`.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDateTime;
use pyo3::prelude::*;

pub mod config;
pub mod cost;
pub mod cpm;
pub mod crashing;
pub mod error;
pub mod interner;
pub mod logging;
pub mod models;
pub mod project;
pub mod scenario;
pub mod supplier_analysis;
pub mod tree;
pub mod validation;

pub use config::{AnalysisConfig, CrashStrategy};
pub use cost::{CostBreakdown, Financials};
pub use cpm::{CpmSummary, ScheduledActivity};
pub use crashing::{CrashPotential, CrashResult, CrashStep};
pub use error::EngineError;
pub use models::{
    period_minutes, Activity, Asset, HumanResource, MaterialResource, Period, Resource,
    ResourceKind, Supplier, SupplierDirectory,
};
pub use project::Project;
pub use scenario::{
    ActivityOverride, Scenario, ScenarioComparison, ScenarioResult, ScenarioRun, WhatIfEngine,
};
pub use supplier_analysis::SupplierRequirement;

/// Run the forward and backward pass, writing ES/EF/LS/LF/slack in place.
#[pyfunction]
#[pyo3(signature = (root, verbosity=0))]
fn compute_cpm(mut root: PyRefMut<'_, Activity>, verbosity: u8) {
    cpm::compute_cpm_verbose(&mut root, verbosity);
}

#[pyfunction]
fn cpm_summary(root: PyRef<'_, Activity>) -> CpmSummary {
    cpm::cpm_summary(&root)
}

/// Zero-slack activities in pre-order. Requires a prior `compute_cpm`.
#[pyfunction]
fn critical_path(root: PyRef<'_, Activity>) -> Vec<Activity> {
    cpm::critical_path(&root).into_iter().cloned().collect()
}

#[pyfunction]
fn activities_by_es(root: PyRef<'_, Activity>) -> Vec<Activity> {
    cpm::activities_by_es(&root).into_iter().cloned().collect()
}

/// Wall-clock start/end of each activity for a project starting at `project_start`.
///
/// # Raises
/// * ValueError if an activity falls outside the representable calendar
#[pyfunction]
fn schedule_dates(
    root: PyRef<'_, Activity>,
    project_start: NaiveDateTime,
) -> PyResult<Vec<ScheduledActivity>> {
    Ok(cpm::schedule_dates(&root, project_start)?)
}

#[pyfunction]
fn total_cost(root: PyRef<'_, Activity>) -> f64 {
    cost::total_cost(&root)
}

#[pyfunction]
fn cost_breakdown(root: PyRef<'_, Activity>) -> CostBreakdown {
    cost::cost_breakdown(&root)
}

#[pyfunction]
fn financials(root: PyRef<'_, Activity>, sell_price: f64) -> Financials {
    cost::financials(&root, sell_price)
}

/// Shorten the project as much as `budget` allows.
///
/// # Raises
/// * ValueError if the configured crash strategy is unknown
#[pyfunction]
#[pyo3(signature = (root, budget, config=None))]
fn crash_with_budget(
    root: PyRef<'_, Activity>,
    budget: f64,
    config: Option<AnalysisConfig>,
) -> PyResult<CrashResult> {
    let config = config.unwrap_or_default();
    Ok(crashing::crash_with_budget(&root, budget, &config)?)
}

/// Cheapest way to save `target_minutes`.
///
/// # Raises
/// * ValueError if the configured crash strategy is unknown
#[pyfunction]
#[pyo3(signature = (root, target_minutes, config=None))]
fn crash_to_save_time(
    root: PyRef<'_, Activity>,
    target_minutes: i64,
    config: Option<AnalysisConfig>,
) -> PyResult<CrashResult> {
    let config = config.unwrap_or_default();
    Ok(crashing::crash_to_save_time(&root, target_minutes, &config)?)
}

#[pyfunction]
fn max_crash_potential(root: PyRef<'_, Activity>) -> CrashPotential {
    crashing::max_crash_potential(&root)
}

/// Supplier demand for producing `production_target` units per `target_period`.
///
/// # Raises
/// * ValueError if `target_period` is not a known period name
#[pyfunction]
#[pyo3(signature = (root, production_target, target_period, config=None))]
fn supplier_requirements(
    root: PyRef<'_, Activity>,
    production_target: f64,
    target_period: &str,
    config: Option<AnalysisConfig>,
) -> PyResult<Vec<SupplierRequirement>> {
    let period: Period = target_period.parse()?;
    let config = config.unwrap_or_default();
    Ok(supplier_analysis::calculate_supplier_requirements(
        &root,
        production_target,
        period,
        &config,
    ))
}

#[pyfunction]
fn validate_supplier_usage(root: PyRef<'_, Activity>) -> PyResult<()> {
    Ok(supplier_analysis::validate_supplier_usage(&root)?)
}

/// # Raises
/// * ValueError describing every problem found
#[pyfunction]
fn validate(root: PyRef<'_, Activity>) -> PyResult<()> {
    Ok(validation::validate(&root)?)
}

#[pyfunction]
fn clone_activity(root: PyRef<'_, Activity>) -> Activity {
    scenario::clone_activity(&root)
}

/// Evaluate one scenario. Returns the modified tree and its summary.
#[pyfunction]
#[pyo3(signature = (base, scenario, config=None))]
fn run_scenario(
    base: PyRef<'_, Activity>,
    scenario: PyRef<'_, Scenario>,
    config: Option<AnalysisConfig>,
) -> (Activity, ScenarioResult) {
    let engine = WhatIfEngine::new(&base, config.unwrap_or_default());
    let run = engine.run_scenario(&scenario);
    (run.tree, run.result)
}

/// Evaluate scenarios independently against `base`, in parallel, results in
/// input order.
#[pyfunction]
#[pyo3(signature = (base, scenarios, config=None))]
fn run_scenarios(
    py: Python<'_>,
    base: PyRef<'_, Activity>,
    scenarios: Vec<Scenario>,
    config: Option<AnalysisConfig>,
) -> Vec<ScenarioResult> {
    let base = Activity::clone(&base);
    let config = config.unwrap_or_default();
    py.allow_threads(|| {
        WhatIfEngine::new(&base, config)
            .run_scenarios_concurrently(&scenarios)
            .into_iter()
            .map(|run| run.result)
            .collect()
    })
}

#[pyfunction]
fn compare_scenarios(results: Vec<ScenarioResult>) -> Option<ScenarioComparison> {
    scenario::compare(&results)
}

/// The planwright.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Activity>()?;
    m.add_class::<HumanResource>()?;
    m.add_class::<MaterialResource>()?;
    m.add_class::<Asset>()?;
    m.add_class::<Supplier>()?;
    m.add_class::<Period>()?;
    m.add_class::<Project>()?;

    // Config types
    m.add_class::<AnalysisConfig>()?;

    // Results
    m.add_class::<CpmSummary>()?;
    m.add_class::<ScheduledActivity>()?;
    m.add_class::<CostBreakdown>()?;
    m.add_class::<Financials>()?;
    m.add_class::<CrashPotential>()?;
    m.add_class::<CrashStep>()?;
    m.add_class::<CrashResult>()?;
    m.add_class::<SupplierRequirement>()?;

    // Scenarios
    m.add_class::<ActivityOverride>()?;
    m.add_class::<Scenario>()?;
    m.add_class::<ScenarioResult>()?;
    m.add_class::<ScenarioComparison>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(compute_cpm, m)?)?;
    m.add_function(wrap_pyfunction!(cpm_summary, m)?)?;
    m.add_function(wrap_pyfunction!(critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(activities_by_es, m)?)?;
    m.add_function(wrap_pyfunction!(schedule_dates, m)?)?;
    m.add_function(wrap_pyfunction!(total_cost, m)?)?;
    m.add_function(wrap_pyfunction!(cost_breakdown, m)?)?;
    m.add_function(wrap_pyfunction!(financials, m)?)?;
    m.add_function(wrap_pyfunction!(crash_with_budget, m)?)?;
    m.add_function(wrap_pyfunction!(crash_to_save_time, m)?)?;
    m.add_function(wrap_pyfunction!(max_crash_potential, m)?)?;
    m.add_function(wrap_pyfunction!(supplier_requirements, m)?)?;
    m.add_function(wrap_pyfunction!(validate_supplier_usage, m)?)?;
    m.add_function(wrap_pyfunction!(validate, m)?)?;
    m.add_function(wrap_pyfunction!(clone_activity, m)?)?;
    m.add_function(wrap_pyfunction!(run_scenario, m)?)?;
    m.add_function(wrap_pyfunction!(run_scenarios, m)?)?;
    m.add_function(wrap_pyfunction!(compare_scenarios, m)?)?;

    Ok(())
}
