//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `verbose` - If true, enables DEBUG level logging; otherwise `default_level`.
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
///
/// # Notes
///
/// - Log output goes to stderr (stdout is reserved for results)
/// - The RUST_LOG environment variable can override the log level
pub fn init(default_level: &str, verbose: bool, json_format: bool) {
    let level = if verbose { "debug" } else { default_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging with settings from the config file, with CLI overrides.
pub fn init_from_config(
    config: &crl_assist_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let json_format = json_logs_override || config.logging.format == "json";
    init(&config.logging.level, verbose_override, json_format);
}
