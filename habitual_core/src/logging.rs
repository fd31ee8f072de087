//! Logging infrastructure for Habitual.
//!
//! Provides centralized tracing setup for the CLI. Logs go to stderr so that
//! command output on stdout stays scriptable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when RUST_LOG is unset
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialize logging with sensible defaults
///
/// Default level is [`DEFAULT_LEVEL`], but can be overridden with RUST_LOG env var.
pub fn init() {
    init_with_level(DEFAULT_LEVEL)
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (debug, info, warn, error)
///
/// This can still be overridden by RUST_LOG environment variable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_keeps_info_quiet() {
        assert_eq!(DEFAULT_LEVEL, "warn");
        assert!(EnvFilter::try_new(DEFAULT_LEVEL).is_ok());
    }
}
