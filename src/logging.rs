// src/logging.rs

//! Tracing setup for both binaries.
//!
//! Filtering follows `RUST_LOG` and falls back to `info`. Output always goes
//! to stderr: the client reserves stdout for its results.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Human-readable lines for the CLI.
pub fn init_cli() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter())
        .try_init();
}

/// JSON lines for the Lambda handler; CloudWatch adds its own timestamps.
pub fn init_handler() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter())
        .try_init();
}
