//! Forward and backward passes over the activity tree.
//!
//! The tree is an AND-join schedule: a parent can only start once every one
//! of its sub-activities has finished. Leaves start at 0 and the root finishes
//! last, so the root's earliest finish is the project duration.

use chrono::{Duration, NaiveDateTime};

use crate::error::EngineError;
use crate::logging::VERBOSITY_SILENT;
use crate::models::Activity;
use crate::tree::{count_activities, walk};
use crate::{log_summary, log_trace};

use super::types::{CpmSummary, ScheduledActivity};

/// Compute ES, EF, LS, LF and slack for every activity in the tree.
pub fn compute_cpm(root: &mut Activity) {
    compute_cpm_verbose(root, VERBOSITY_SILENT);
}

/// `compute_cpm` with diagnostics at the given verbosity.
pub fn compute_cpm_verbose(root: &mut Activity, verbosity: u8) {
    forward_pass(root, verbosity);
    let deadline = root.ef;
    backward_pass(root, deadline, verbosity);
    log_summary!(
        verbosity,
        "CPM: activity {} finishes at {} min",
        root.id,
        deadline
    );
}

/// Post-order: children first, then `ES = max(child EF)`.
fn forward_pass(node: &mut Activity, verbosity: u8) {
    let mut earliest_start = 0;
    for child in &mut node.sub_activities {
        forward_pass(child, verbosity);
        earliest_start = earliest_start.max(child.ef);
    }
    node.es = earliest_start;
    node.ef = earliest_start + node.duration;
    log_trace!(verbosity, "forward {}: ES={} EF={}", node.id, node.es, node.ef);
}

/// Pre-order: each child must finish by its parent's latest start.
fn backward_pass(node: &mut Activity, latest_finish: i64, verbosity: u8) {
    node.lf = latest_finish;
    node.ls = latest_finish - node.duration;
    node.slack = node.ls - node.es;
    log_trace!(
        verbosity,
        "backward {}: LS={} LF={} slack={}",
        node.id,
        node.ls,
        node.lf,
        node.slack
    );

    let parent_ls = node.ls;
    for child in &mut node.sub_activities {
        backward_pass(child, parent_ls, verbosity);
    }
}

/// Every zero-slack activity, in pre-order.
///
/// Ties are kept: sibling branches of equal length are all reported.
pub fn critical_path(root: &Activity) -> Vec<&Activity> {
    let mut critical = Vec::new();
    walk(root, |a| {
        if a.is_critical() {
            critical.push(a);
        }
    });
    critical
}

#[inline]
pub fn total_duration(root: &Activity) -> i64 {
    root.ef
}

pub fn cpm_summary(root: &Activity) -> CpmSummary {
    CpmSummary {
        total_duration: total_duration(root),
        critical_path: critical_path(root).iter().map(|a| a.id.clone()).collect(),
        activity_count: count_activities(root),
    }
}

/// All activities ordered by `(ES, EF, ID)`.
pub fn activities_by_es(root: &Activity) -> Vec<&Activity> {
    let mut ordered = Vec::with_capacity(count_activities(root));
    walk(root, |a| ordered.push(a));
    ordered.sort_by(|a, b| {
        a.es.cmp(&b.es)
            .then(a.ef.cmp(&b.ef))
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}

/// Project each activity's earliest window onto wall-clock time starting at
/// `project_start`, in `activities_by_es` order.
///
/// Fails with `InvalidActivity` when a window falls outside the calendar
/// range `chrono` can represent.
pub fn schedule_dates(
    root: &Activity,
    project_start: NaiveDateTime,
) -> Result<Vec<ScheduledActivity>, EngineError> {
    activities_by_es(root)
        .into_iter()
        .map(|a| {
            Ok(ScheduledActivity {
                activity_id: a.id.clone(),
                name: a.name.clone(),
                start: offset(project_start, a, a.es)?,
                end: offset(project_start, a, a.ef)?,
                slack: a.slack,
            })
        })
        .collect()
}

fn offset(
    project_start: NaiveDateTime,
    activity: &Activity,
    minutes: i64,
) -> Result<NaiveDateTime, EngineError> {
    Duration::try_minutes(minutes)
        .and_then(|delta| project_start.checked_add_signed(delta))
        .ok_or_else(|| {
            EngineError::InvalidActivity(format!(
                "activity '{}' at minute {} is outside the representable calendar",
                activity.id, minutes
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn leaf(id: &str, duration: i64) -> Activity {
        Activity::new(id, format!("task {}", id), duration)
    }

    fn ids(activities: &[&Activity]) -> Vec<String> {
        activities.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_single_leaf() {
        let mut root = leaf("1", 7);
        compute_cpm(&mut root);
        assert_eq!((root.es, root.ef, root.ls, root.lf, root.slack), (0, 7, 0, 7, 0));
        assert_eq!(total_duration(&root), 7);
    }

    #[test]
    fn test_sole_child_runs_before_parent() {
        let mut root = leaf("1", 3).with_sub_activity(leaf("2", 5));
        compute_cpm(&mut root);

        let child = &root.sub_activities[0];
        assert_eq!((child.es, child.ef), (0, 5));
        assert_eq!((root.es, root.ef), (5, 8));
        assert_eq!(child.slack, 0);
        assert_eq!(root.slack, 0);
    }

    #[test]
    fn test_sibling_slack() {
        let mut root = leaf("1", 1)
            .with_sub_activity(leaf("2", 2))
            .with_sub_activity(leaf("3", 4));
        compute_cpm(&mut root);

        assert_eq!((root.es, root.ef), (4, 5));
        assert_eq!(root.sub_activities[0].slack, 2);
        assert_eq!(root.sub_activities[1].slack, 0);
        assert_eq!(ids(&critical_path(&root)), vec!["1", "3"]);
    }

    #[test]
    fn test_root_slack_always_zero() {
        let mut root = leaf("1", 0)
            .with_sub_activity(leaf("2", 9).with_sub_activity(leaf("4", 1)))
            .with_sub_activity(
                leaf("3", 2)
                    .with_sub_activity(leaf("5", 3))
                    .with_sub_activity(leaf("6", 12)),
            );
        compute_cpm(&mut root);
        assert_eq!(root.slack, 0);
        assert_eq!(root.lf, root.ef);
        assert_eq!(total_duration(&root), 14);
        assert_eq!(ids(&critical_path(&root)), vec!["1", "3", "6"]);
    }

    #[test]
    fn test_slack_propagates_into_subtree() {
        // Branch 2 (5 min total) runs alongside branch 3 (10 min).
        let mut root = leaf("1", 1)
            .with_sub_activity(leaf("2", 3).with_sub_activity(leaf("4", 2)))
            .with_sub_activity(leaf("3", 10));
        compute_cpm(&mut root);

        let branch = &root.sub_activities[0];
        assert_eq!(branch.slack, 5);
        assert_eq!(branch.sub_activities[0].slack, 5);
        assert_eq!(branch.sub_activities[0].lf, 7);
    }

    #[test]
    fn test_ties_are_all_critical() {
        let mut root = leaf("1", 1)
            .with_sub_activity(leaf("2", 4))
            .with_sub_activity(leaf("3", 4));
        compute_cpm(&mut root);
        assert_eq!(ids(&critical_path(&root)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_summary() {
        let mut root = leaf("1", 1)
            .with_sub_activity(leaf("2", 2))
            .with_sub_activity(leaf("3", 4));
        compute_cpm(&mut root);

        let summary = cpm_summary(&root);
        assert_eq!(summary.total_duration, 5);
        assert_eq!(summary.critical_path, vec!["1", "3"]);
        assert_eq!(summary.activity_count, 3);
    }

    #[test]
    fn test_activities_by_es_ordering() {
        let mut root = leaf("1", 1)
            .with_sub_activity(leaf("b", 4))
            .with_sub_activity(leaf("a", 4))
            .with_sub_activity(leaf("c", 2));
        compute_cpm(&mut root);
        // All children start at 0; c finishes first, a/b tie on EF and sort by ID.
        assert_eq!(ids(&activities_by_es(&root)), vec!["c", "a", "b", "1"]);
    }

    #[test]
    fn test_schedule_dates() {
        let mut root = leaf("1", 60).with_sub_activity(leaf("2", 90));
        compute_cpm(&mut root);

        let start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let dates = schedule_dates(&root, start).unwrap();

        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].activity_id, "2");
        assert_eq!(dates[0].end, start + Duration::minutes(90));
        assert_eq!(dates[1].start, start + Duration::minutes(90));
        assert_eq!(dates[1].end, start + Duration::minutes(150));
    }

    #[test]
    fn test_schedule_dates_out_of_calendar_range() {
        let mut root = leaf("1", 10).with_sub_activity(leaf("2", 1_000_000_000_000_000));
        compute_cpm(&mut root);

        let start = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        match schedule_dates(&root, start) {
            Err(EngineError::InvalidActivity(msg)) => assert!(msg.contains("'2'")),
            other => panic!("expected InvalidActivity, got {:?}", other),
        }
    }

    #[test]
    fn test_recompute_after_edit() {
        let mut root = leaf("1", 1)
            .with_sub_activity(leaf("2", 2))
            .with_sub_activity(leaf("3", 4));
        compute_cpm(&mut root);
        root.sub_activities[0].duration = 6;
        compute_cpm(&mut root);
        assert_eq!(total_duration(&root), 7);
        assert_eq!(root.sub_activities[1].slack, 2);
    }
}
