//! What-if evaluation of scenarios against a base tree.

use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::cost::{financials_for_cost, total_cost};
use crate::cpm::{compute_cpm_verbose, critical_path, total_duration};
use crate::crashing::max_crash_potential;
use crate::models::Activity;
use crate::{log_steps, log_summary};

use super::clone::clone_activity;
use super::types::{ActivityOverride, Scenario, ScenarioComparison, ScenarioResult};

/// A scenario's modified tree together with its summary.
#[derive(Clone, Debug)]
pub struct ScenarioRun {
    /// The base tree with the scenario applied and CPM computed.
    pub tree: Activity,
    pub result: ScenarioResult,
}

/// Apply a scenario to a copy of `root`. The source is never modified.
///
/// Overrides naming an activity that is not in the tree are ignored.
pub fn apply_scenario(root: &Activity, scenario: &Scenario) -> Activity {
    apply_scenario_verbose(root, scenario, 0)
}

fn apply_scenario_verbose(root: &Activity, scenario: &Scenario, verbosity: u8) -> Activity {
    let mut copy = clone_activity(root);
    for (activity_id, ovr) in sorted_overrides(scenario) {
        match copy.find_mut(activity_id) {
            Some(activity) => {
                apply_override(activity, ovr);
                log_steps!(
                    verbosity,
                    "scenario '{}': overrode {}",
                    scenario.name,
                    activity_id
                );
            }
            None => log_steps!(
                verbosity,
                "scenario '{}': no activity {}, override ignored",
                scenario.name,
                activity_id
            ),
        }
    }
    copy
}

/// Overrides ordered by activity ID, so application and its log lines are
/// reproducible.
fn sorted_overrides(scenario: &Scenario) -> Vec<(&String, &ActivityOverride)> {
    let mut overrides: Vec<_> = scenario.overrides.iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(b.0));
    overrides
}

fn apply_override(activity: &mut Activity, ovr: &ActivityOverride) {
    if let Some(duration) = ovr.duration {
        activity.duration = duration;
    }
    if let Some(min_duration) = ovr.min_duration {
        activity.min_duration = min_duration;
    }
    if let Some(step) = ovr.crash_cost_step {
        activity.crash_cost_step = step;
    }
    if ovr.human_cost_factor != 1.0 {
        for human in &mut activity.human_resources {
            human.cost_per_h *= ovr.human_cost_factor;
        }
    }
    if ovr.material_cost_factor != 1.0 {
        for material in &mut activity.material_resources {
            material.unit_cost *= ovr.material_cost_factor;
        }
    }
    if ovr.asset_cost_factor != 1.0 {
        for asset in &mut activity.assets {
            asset.cost_per_use *= ovr.asset_cost_factor;
        }
    }
}

/// Evaluates scenarios against one base tree. Every scenario starts from the
/// base, never from another scenario's result.
pub struct WhatIfEngine<'a> {
    base: &'a Activity,
    config: AnalysisConfig,
}

impl<'a> WhatIfEngine<'a> {
    pub fn new(base: &'a Activity, config: AnalysisConfig) -> Self {
        Self { base, config }
    }

    pub fn run_scenario(&self, scenario: &Scenario) -> ScenarioRun {
        let verbosity = self.config.verbosity;
        let mut tree = apply_scenario_verbose(self.base, scenario, verbosity);
        compute_cpm_verbose(&mut tree, verbosity);

        let cost = total_cost(&tree);
        let financials = financials_for_cost(cost, scenario.sell_price);
        let potential = max_crash_potential(&tree);

        let result = ScenarioResult {
            scenario_name: scenario.name.clone(),
            total_duration: total_duration(&tree),
            total_cost: cost,
            sell_price: scenario.sell_price,
            margin: financials.margin,
            markup: financials.markup,
            is_viable: financials.is_viable,
            critical_path_len: critical_path(&tree).len(),
            max_crash_time: potential.time,
            max_crash_cost: potential.cost,
        };
        log_summary!(
            verbosity,
            "scenario '{}': {} min, cost {}, margin {}",
            result.scenario_name,
            result.total_duration,
            result.total_cost,
            result.margin
        );

        ScenarioRun { tree, result }
    }

    /// Run each scenario independently, results in input order.
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Vec<ScenarioRun> {
        scenarios.iter().map(|s| self.run_scenario(s)).collect()
    }

    /// `run_scenarios` on the rayon thread pool. Results keep input order.
    pub fn run_scenarios_concurrently(&self, scenarios: &[Scenario]) -> Vec<ScenarioRun> {
        scenarios.par_iter().map(|s| self.run_scenario(s)).collect()
    }
}

/// Pick the cheapest, fastest and highest-margin scenarios. `None` when
/// `results` is empty.
pub fn compare(results: &[ScenarioResult]) -> Option<ScenarioComparison> {
    let cheapest = results
        .iter()
        .min_by(|a, b| a.total_cost.total_cmp(&b.total_cost))?;
    let fastest = results.iter().min_by_key(|r| r.total_duration)?;
    let best_margin = results
        .iter()
        .min_by(|a, b| b.margin.total_cmp(&a.margin))?;

    Some(ScenarioComparison {
        cheapest: cheapest.scenario_name.clone(),
        fastest: fastest.scenario_name.clone(),
        best_margin: best_margin.scenario_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpm::compute_cpm;
    use crate::models::{Asset, HumanResource, MaterialResource};

    /// Root (10 min) waits on a 60-minute dig and a 30-minute order.
    fn base_tree() -> Activity {
        let mut root = Activity::new("1", "project", 10)
            .with_human(HumanResource::new("pm", 60.0, 1.0).unwrap())
            .with_sub_activity(
                Activity::new("2", "dig", 60)
                    .with_crash(40, 3.0)
                    .with_human(HumanResource::new("digger", 30.0, 2.0).unwrap())
                    .with_asset(Asset::new("excavator", 200.0, 1.0).unwrap()),
            )
            .with_sub_activity(
                Activity::new("3", "order", 30)
                    .with_crash(20, 1.0)
                    .with_material(MaterialResource::new("gravel", 5.0, 10.0).unwrap()),
            );
        compute_cpm(&mut root);
        root
    }

    fn engine(base: &Activity) -> WhatIfEngine<'_> {
        WhatIfEngine::new(base, AnalysisConfig::default())
    }

    #[test]
    fn test_baseline_scenario() {
        let base = base_tree();
        let run = engine(&base).run_scenario(&Scenario::new("baseline", 500.0));

        // pm 10 + diggers 60 + excavator 200 + gravel 50
        assert!((run.result.total_cost - 320.0).abs() < 1e-9);
        assert_eq!(run.result.total_duration, 70);
        assert!((run.result.margin - 180.0).abs() < 1e-9);
        assert!(run.result.is_viable);
        assert_eq!(run.result.critical_path_len, 2);
        assert_eq!(run.result.max_crash_time, 30);
        assert!((run.result.max_crash_cost - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_duration_override_changes_critical_path() {
        let base = base_tree();
        let scenario =
            Scenario::new("slow order", 500.0).with_override("3", ActivityOverride::duration(90));
        let run = engine(&base).run_scenario(&scenario);

        assert_eq!(run.result.total_duration, 100);
        assert_eq!(run.tree.find("3").unwrap().slack, 0);
        assert_eq!(run.tree.find("2").unwrap().slack, 30);
        // Base untouched.
        assert_eq!(base.find("3").unwrap().duration, 30);
        assert_eq!(base.ef, 70);
    }

    #[test]
    fn test_cost_factors() {
        let base = base_tree();
        let scenario = Scenario::new("pricier", 500.0)
            .with_override("2", ActivityOverride::cost_factors(2.0, 1.0, 0.5))
            .with_override("3", ActivityOverride::cost_factors(1.0, 3.0, 1.0));
        let run = engine(&base).run_scenario(&scenario);

        // pm 10 + diggers 120 + excavator 100 + gravel 150
        assert!((run.result.total_cost - 380.0).abs() < 1e-9);
        assert!((total_cost(&base) - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_activity_override_is_ignored() {
        let base = base_tree();
        let scenario =
            Scenario::new("ghost", 0.0).with_override("99", ActivityOverride::duration(1));
        let run = engine(&base).run_scenario(&scenario);
        assert_eq!(run.result.total_duration, 70);
    }

    #[test]
    fn test_crash_field_overrides() {
        let base = base_tree();
        let ovr = ActivityOverride {
            min_duration: Some(10),
            crash_cost_step: Some(4.0),
            ..ActivityOverride::default()
        };
        let scenario = Scenario::new("deep crash", 0.0).with_override("2", ovr);
        let run = engine(&base).run_scenario(&scenario);
        let dig = run.tree.find("2").unwrap();
        assert_eq!(dig.min_duration, 10);
        assert_eq!(run.result.max_crash_time, 60);
        assert!((run.result.max_crash_cost - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_scenarios_are_independent_and_ordered() {
        let base = base_tree();
        let scenarios = vec![
            Scenario::new("a", 100.0).with_override("2", ActivityOverride::duration(100)),
            Scenario::new("b", 100.0),
            Scenario::new("c", 100.0).with_override("1", ActivityOverride::duration(0)),
        ];
        let runs = engine(&base).run_scenarios(&scenarios);

        let names: Vec<&str> = runs.iter().map(|r| r.result.scenario_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        // "b" must not see "a"'s change.
        assert_eq!(runs[1].result.total_duration, 70);
        assert_eq!(runs[2].result.total_duration, 60);
    }

    #[test]
    fn test_concurrent_runs_match_sequential() {
        let base = base_tree();
        let scenarios: Vec<Scenario> = (0..8)
            .map(|i| {
                Scenario::new(format!("s{}", i), 400.0)
                    .with_override("2", ActivityOverride::duration(40 + i * 10))
            })
            .collect();
        let engine = engine(&base);

        let sequential: Vec<ScenarioResult> = engine
            .run_scenarios(&scenarios)
            .into_iter()
            .map(|r| r.result)
            .collect();
        let concurrent: Vec<ScenarioResult> = engine
            .run_scenarios_concurrently(&scenarios)
            .into_iter()
            .map(|r| r.result)
            .collect();
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_overrides_applied_in_id_order() {
        let scenario = Scenario::new("many", 0.0)
            .with_override("3", ActivityOverride::duration(1))
            .with_override("10", ActivityOverride::duration(1))
            .with_override("1", ActivityOverride::duration(1))
            .with_override("2", ActivityOverride::duration(1));
        let ids: Vec<&str> = sorted_overrides(&scenario)
            .into_iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "10", "2", "3"]);
    }

    #[test]
    fn test_concurrent_runs_on_large_batch() {
        let base = base_tree();
        let scenarios: Vec<Scenario> = (0..1000)
            .map(|i| {
                Scenario::new(format!("s{}", i), 400.0)
                    .with_override("3", ActivityOverride::duration(i))
            })
            .collect();
        let runs = engine(&base).run_scenarios_concurrently(&scenarios);

        assert_eq!(runs.len(), 1000);
        for (i, run) in runs.iter().enumerate() {
            assert_eq!(run.result.scenario_name, format!("s{}", i));
            assert_eq!(run.result.total_duration, 10 + (i as i64).max(60));
        }
    }

    #[test]
    fn test_compare() {
        let results = vec![
            ScenarioResult {
                scenario_name: "a".to_string(),
                total_duration: 50,
                total_cost: 300.0,
                margin: 10.0,
                ..ScenarioResult::default()
            },
            ScenarioResult {
                scenario_name: "b".to_string(),
                total_duration: 40,
                total_cost: 300.0,
                margin: 20.0,
                ..ScenarioResult::default()
            },
            ScenarioResult {
                scenario_name: "c".to_string(),
                total_duration: 40,
                total_cost: 350.0,
                margin: 20.0,
                ..ScenarioResult::default()
            },
        ];
        let comparison = compare(&results).unwrap();
        assert_eq!(comparison.cheapest, "a");
        assert_eq!(comparison.fastest, "b");
        assert_eq!(comparison.best_margin, "b");
        assert!(compare(&[]).is_none());
    }
}
