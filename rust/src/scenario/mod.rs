//! Deep cloning and what-if scenario analysis.
//!
//! Scenarios are applied to alias-free copies of the base tree, so any number
//! of them can be evaluated against the same base, on separate threads if
//! desired, without locking.

mod clone;
mod engine;
mod types;

pub use clone::clone_activity;
pub use engine::{apply_scenario, compare, ScenarioRun, WhatIfEngine};
pub use types::{ActivityOverride, Scenario, ScenarioComparison, ScenarioResult};
