//! Verbosity-gated diagnostics for the analysis engine.
//!
//! Output goes to stderr and costs nothing when verbosity is 0.
//! Levels:
//! - 0: SILENT
//! - 1: SUMMARY (final result of an analysis)
//! - 2: STEPS (greedy crash choices, supplier aggregation, scenario overrides)
//! - 3: TRACE (per-node CPM values)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_STEPS: u8 = 2;
pub const VERBOSITY_TRACE: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!("[planwright] {}", format_args!($($arg)*));
        }
    };
}

/// Log at STEPS level (verbosity >= 2).
#[macro_export]
macro_rules! log_steps {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_STEPS {
            eprintln!("[planwright]   {}", format_args!($($arg)*));
        }
    };
}

/// Log at TRACE level (verbosity >= 3).
#[macro_export]
macro_rules! log_trace {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_TRACE {
            eprintln!("[planwright]     {}", format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_SUMMARY);
        assert!(VERBOSITY_SUMMARY < VERBOSITY_STEPS);
        assert!(VERBOSITY_STEPS < VERBOSITY_TRACE);
    }

    #[test]
    fn test_silent_macros_expand() {
        let verbosity = VERBOSITY_SILENT;
        log_summary!(verbosity, "total {}", 1);
        log_steps!(verbosity, "step {}", 2);
        log_trace!(verbosity, "node {}", 3);
    }
}
