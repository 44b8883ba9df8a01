//! Logging setup utilities for the countdown server and client.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the calling binary and every crate of this workspace.
/// It can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "countdown-server")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use countdown_shared::logger::setup_logger;
///
/// setup_logger("countdown-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the directive string used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    [
        "countdown_shared",
        "countdown_server",
        "countdown_client",
        &binary_name.replace('-', "_"),
        "tower_http",
    ]
    .iter()
    .map(|target| format!("{}={}", target, default_log_level))
    .collect::<Vec<_>>()
    .join(",")
}
