//! Shared setup for the McuCore developer tools.

use env_logger::{Env, Target};

/// Diagnostics go to stderr so that stdout carries only tool output.
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stderr)
        .format_timestamp_millis()
        .init();
}
