//! Logging to stderr using env_logger
//!
//! The workflow runner captures stderr into the step log, so no log file is
//! written. Verbosity follows `RUST_LOG`, defaulting to `info`; setting
//! `RUNNER_DEBUG=1` (the "debug logging" switch of a re-run) raises the
//! default to `debug`.

use env_logger::{Builder, Env};

/// Default filter when `RUST_LOG` is not set
fn default_filter(runner_debug: bool) -> &'static str {
    if runner_debug {
        "debug"
    } else {
        "info"
    }
}

/// Initialize stderr logging
pub fn init() {
    let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");

    Builder::from_env(Env::default().default_filter_or(default_filter(runner_debug)))
        .format_timestamp_secs()
        .init();
}
