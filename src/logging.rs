//! Logging setup for the provider binary.
//!
//! All logs are written to **stderr**; stdout carries the handshake line.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: a full `tracing` filter, e.g.
//!   `terraform_provider_pingdirectory=debug`. Takes precedence.
//! - `TF_LOG`: a plain level set by the plugin host (`TRACE`, `DEBUG`,
//!   `INFO`, `WARN`, `ERROR`). Used when `RUST_LOG` is unset.
//!
//! Without either, the level is `info`.
//!
//! ```bash
//! # Log every Configuration API operation
//! TF_LOG=DEBUG terraform apply
//!
//! # Only the provider's own debug logs
//! RUST_LOG=terraform_provider_pingdirectory=debug terraform apply
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Initialize the global subscriber.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    let filter = filter_from_env(
        std::env::var("RUST_LOG").ok().as_deref(),
        std::env::var("TF_LOG").ok().as_deref(),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Useful in tests, where several tests may race to set the subscriber.
pub fn try_init_logging() -> bool {
    let filter = filter_from_env(
        std::env::var("RUST_LOG").ok().as_deref(),
        std::env::var("TF_LOG").ok().as_deref(),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Build the filter from the values of `RUST_LOG` and `TF_LOG`.
fn filter_from_env(rust_log: Option<&str>, tf_log: Option<&str>) -> EnvFilter {
    if let Some(filter) = rust_log
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
    {
        return filter;
    }
    EnvFilter::new(tf_log.and_then(tf_log_level).unwrap_or(DEFAULT_LEVEL))
}

/// Map a `TF_LOG` value onto a `tracing` level.
fn tf_log_level(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "JSON" => Some("trace"),
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARN" => Some("warn"),
        "ERROR" => Some("error"),
        _ => None,
    }
}
