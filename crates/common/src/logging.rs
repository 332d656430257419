//! Logging and tracing initialization.
//!
//! Logs always go to stderr: the CLI prints post documents on stdout and
//! must not interleave log lines with them.

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    }
}

/// Route logs through the libtest capture so they only show for failing tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
