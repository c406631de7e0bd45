#![deny(missing_docs)]
//! Shared logging utilities for the leadgen workspace.
//!
//! Every crate logs through the `campaign_*` macros below so that diagnostics
//! carry a single target and can be filtered apart from third-party noise
//! (reqwest, hyper). Operator-facing campaign logs are domain data and live in
//! `leadgen_core`; this crate is only for diagnostics.

use log::LevelFilter;

/// Log target attached to every record emitted through the macros.
pub const LOG_TARGET: &str = "leadgen";

#[doc(hidden)]
pub use log as __log;

/// Logs a trace-level message under the workspace target.
#[macro_export]
macro_rules! campaign_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the workspace target.
#[macro_export]
macro_rules! campaign_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the workspace target.
#[macro_export]
macro_rules! campaign_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the workspace target.
#[macro_export]
macro_rules! campaign_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the workspace target.
#[macro_export]
macro_rules! campaign_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Maps the `--verbose` switch of the binary to a level filter.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized, so
/// every test may call it.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    // Debug builds get the verbose level; release test runs stay quieter.
    let level = level_for(cfg!(debug_assertions));
    let config = ConfigBuilder::new()
        .add_filter_allow_str(LOG_TARGET)
        .build();

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
