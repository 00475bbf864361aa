//! Result types for CPM analysis.

use chrono::NaiveDateTime;
use pyo3::prelude::*;

/// Project-level view of a CPM run.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpmSummary {
    /// Earliest finish of the root, in minutes.
    #[pyo3(get)]
    pub total_duration: i64,
    /// IDs of zero-slack activities in pre-order.
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    #[pyo3(get)]
    pub activity_count: usize,
}

#[pymethods]
impl CpmSummary {
    fn __repr__(&self) -> String {
        format!(
            "CpmSummary(total_duration={}, critical={}, activities={})",
            self.total_duration,
            self.critical_path.len(),
            self.activity_count
        )
    }
}

/// An activity's CPM window projected onto wall-clock time.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledActivity {
    #[pyo3(get)]
    pub activity_id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub start: NaiveDateTime,
    #[pyo3(get)]
    pub end: NaiveDateTime,
    /// Slack in minutes.
    #[pyo3(get)]
    pub slack: i64,
}

#[pymethods]
impl ScheduledActivity {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledActivity(activity_id={:?}, start={}, end={}, slack={})",
            self.activity_id, self.start, self.end, self.slack
        )
    }
}
