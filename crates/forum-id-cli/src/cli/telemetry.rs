//! Log output for the `forum-id` binary.
//!
//! Filtering follows `RUST_LOG` and defaults to `info`. Logs go to stderr so
//! stdout carries only cursors, tokens, and pages.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber, as human-readable text or JSON lines.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(json: bool) -> anyhow::Result<()> {
    let builder = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
