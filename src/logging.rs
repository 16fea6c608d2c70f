//! Logger set-up for the `stalker` binary and tests.
//!
//! The library itself only talks to the `log` facade; installing a backend is
//! left to whoever embeds it.

use env_logger::{Builder, Env};
use log::LevelFilter;

fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects `debug` and the
/// default is `info`. Calling this more than once is harmless.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None).format_target(verbose);

    // Only fails when a logger is already installed.
    let _ = builder.try_init();
}

/// Routes log output through the test harness capture.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
