//! Critical path method over the activity tree.
//!
//! `compute_cpm` writes the timing fields directly onto each node; the read
//! accessors assume it has been run since the last edit.

mod calculation;
mod types;

pub use calculation::{
    activities_by_es, compute_cpm, compute_cpm_verbose, cpm_summary, critical_path,
    schedule_dates, total_duration,
};
pub use types::{CpmSummary, ScheduledActivity};
