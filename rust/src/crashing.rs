//! Time-cost trade-off: shortening the project by paying to crash activities.
//!
//! Two strategies are available (see [`CrashStrategy`]):
//! - `Static` sorts the critical activities of one CPM snapshot by crash cost
//!   per minute and takes whole activities greedily. With several parallel
//!   critical branches this can pay for minutes that do not shorten the
//!   project.
//! - `Incremental` crashes one minute at a time on a private copy, re-running
//!   CPM after each minute, and only buys minutes that actually shorten the
//!   project. It stops when no single activity can shorten it any further.

use pyo3::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::{AnalysisConfig, CrashStrategy};
use crate::cpm::compute_cpm;
use crate::error::EngineError;
use crate::models::Activity;
use crate::tree::walk;
use crate::{log_steps, log_summary};

/// Upper bound on what crashing could achieve.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrashPotential {
    /// Minutes removable over the whole tree, critical or not.
    #[pyo3(get)]
    pub time: i64,
    #[pyo3(get)]
    pub cost: f64,
}

#[pymethods]
impl CrashPotential {
    fn __repr__(&self) -> String {
        format!("CrashPotential(time={}, cost={})", self.time, self.cost)
    }
}

/// Minutes bought on one activity.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct CrashStep {
    #[pyo3(get)]
    pub activity_id: String,
    #[pyo3(get)]
    pub minutes: i64,
    #[pyo3(get)]
    pub cost: f64,
}

#[pymethods]
impl CrashStep {
    fn __repr__(&self) -> String {
        format!(
            "CrashStep(activity_id={:?}, minutes={}, cost={})",
            self.activity_id, self.minutes, self.cost
        )
    }
}

/// Outcome of a crash plan.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrashResult {
    #[pyo3(get)]
    pub time_saved: i64,
    #[pyo3(get)]
    pub cost: f64,
    /// Whether the requested saving was met. Always true for budget plans.
    #[pyo3(get)]
    pub target_reached: bool,
    #[pyo3(get)]
    pub crashed: Vec<CrashStep>,
}

#[pymethods]
impl CrashResult {
    fn __repr__(&self) -> String {
        format!(
            "CrashResult(time_saved={}, cost={}, target_reached={}, activities={})",
            self.time_saved,
            self.cost,
            self.target_reached,
            self.crashed.len()
        )
    }
}

/// What a crash plan is trying to achieve.
#[derive(Clone, Copy, Debug)]
enum CrashGoal {
    /// Save as much time as possible without spending more than this.
    Budget(f64),
    /// Save at least this many minutes.
    SaveTime(i64),
}

/// A zero-slack activity that still has minutes to give.
#[derive(Debug)]
struct CrashCandidate<'a> {
    activity: &'a Activity,
    time_save: i64,
    cost: f64,
}

/// Sum of `duration - min_duration` over every activity, and what buying all
/// of it would cost.
pub fn max_crash_potential(root: &Activity) -> CrashPotential {
    let mut potential = CrashPotential::default();
    walk(root, |a| {
        let minutes = a.crashable_minutes();
        potential.time += minutes;
        potential.cost += minutes as f64 * a.crash_cost_step;
    });
    potential
}

/// Critical crashable activities, cheapest per minute first. Ties keep
/// pre-order.
fn collect_crashable_critical(root: &Activity) -> Vec<CrashCandidate<'_>> {
    let mut candidates = Vec::new();
    walk(root, |a| {
        if a.is_critical() && a.duration > a.min_duration {
            let time_save = a.duration - a.min_duration;
            candidates.push(CrashCandidate {
                activity: a,
                time_save,
                cost: time_save as f64 * a.crash_cost_step,
            });
        }
    });
    candidates.sort_by(|a, b| {
        a.activity
            .crash_cost_step
            .total_cmp(&b.activity.crash_cost_step)
    });
    candidates
}

/// Shorten the project as much as `budget` allows.
///
/// With the static strategy, CPM must already have been run on `root`.
pub fn crash_with_budget(
    root: &Activity,
    budget: f64,
    config: &AnalysisConfig,
) -> Result<CrashResult, EngineError> {
    run(root, CrashGoal::Budget(budget), config)
}

/// Find the cheapest way to save `target_minutes`.
///
/// With the static strategy, CPM must already have been run on `root`.
pub fn crash_to_save_time(
    root: &Activity,
    target_minutes: i64,
    config: &AnalysisConfig,
) -> Result<CrashResult, EngineError> {
    run(root, CrashGoal::SaveTime(target_minutes), config)
}

fn run(root: &Activity, goal: CrashGoal, config: &AnalysisConfig) -> Result<CrashResult, EngineError> {
    let result = match config.strategy()? {
        CrashStrategy::Static => crash_static(root, goal, config.verbosity),
        CrashStrategy::Incremental => crash_incremental(root, goal, config.verbosity),
    };
    log_summary!(
        config.verbosity,
        "crash ({:?}): saved {} min for {} (target reached: {})",
        goal,
        result.time_saved,
        result.cost,
        result.target_reached
    );
    Ok(result)
}

fn crash_static(root: &Activity, goal: CrashGoal, verbosity: u8) -> CrashResult {
    let mut result = CrashResult::default();

    for candidate in collect_crashable_critical(root) {
        match goal {
            CrashGoal::Budget(budget) => {
                if result.cost + candidate.cost > budget {
                    log_steps!(
                        verbosity,
                        "stop at {}: cost {} exceeds remaining budget {}",
                        candidate.activity.id,
                        candidate.cost,
                        budget - result.cost
                    );
                    break;
                }
            }
            CrashGoal::SaveTime(target) => {
                if result.time_saved >= target {
                    break;
                }
            }
        }

        log_steps!(
            verbosity,
            "crash {} by {} min for {}",
            candidate.activity.id,
            candidate.time_save,
            candidate.cost
        );
        result.time_saved += candidate.time_save;
        result.cost += candidate.cost;
        result.crashed.push(CrashStep {
            activity_id: candidate.activity.id.clone(),
            minutes: candidate.time_save,
            cost: candidate.cost,
        });
    }

    result.target_reached = match goal {
        CrashGoal::Budget(_) => true,
        CrashGoal::SaveTime(target) => result.time_saved >= target,
    };
    result
}

fn crash_incremental(root: &Activity, goal: CrashGoal, verbosity: u8) -> CrashResult {
    let mut work = root.clone();
    compute_cpm(&mut work);

    let mut result = CrashResult::default();
    let mut step_index: FxHashMap<String, usize> = FxHashMap::default();

    loop {
        if let CrashGoal::SaveTime(target) = goal {
            if result.time_saved >= target {
                break;
            }
        }

        let current = work.ef;
        let candidates: Vec<(String, f64)> = collect_crashable_critical(&work)
            .into_iter()
            .map(|c| (c.activity.id.clone(), c.activity.crash_cost_step))
            .collect();

        let mut chosen = None;
        for (id, step_cost) in candidates {
            if let CrashGoal::Budget(budget) = goal {
                // Sorted by cost, so nothing after this fits either.
                if result.cost + step_cost > budget {
                    break;
                }
            }
            if !shorten_by_one(&mut work, &id, -1) {
                continue;
            }
            compute_cpm(&mut work);
            if work.ef < current {
                chosen = Some((id, step_cost));
                break;
            }
            log_steps!(verbosity, "minute off {} does not shorten the project", id);
            shorten_by_one(&mut work, &id, 1);
            compute_cpm(&mut work);
        }

        let Some((id, step_cost)) = chosen else {
            break;
        };

        result.time_saved += current - work.ef;
        result.cost += step_cost;
        log_steps!(
            verbosity,
            "crash {} by 1 min for {} (project now {} min)",
            id,
            step_cost,
            work.ef
        );
        match step_index.get(&id) {
            Some(&i) => {
                result.crashed[i].minutes += 1;
                result.crashed[i].cost += step_cost;
            }
            None => {
                step_index.insert(id.clone(), result.crashed.len());
                result.crashed.push(CrashStep {
                    activity_id: id,
                    minutes: 1,
                    cost: step_cost,
                });
            }
        }
    }

    result.target_reached = match goal {
        CrashGoal::Budget(_) => true,
        CrashGoal::SaveTime(target) => result.time_saved >= target,
    };
    result
}

fn shorten_by_one(root: &mut Activity, id: &str, delta: i64) -> bool {
    match root.find_mut(id) {
        Some(activity) => {
            activity.duration += delta;
            true
        }
        None => false,
    }
}
