use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialise logging. Log output goes to `overmark.log` in the working
/// directory, since the terminal itself is owned by the TUI. The default
/// level is `info`; it can be overridden via the `RUST_LOG` environment
/// variable. The returned guard must be kept alive for the duration of the
/// program or buffered log lines are lost.
pub fn init() -> Result<WorkerGuard> {
    let file = fs::File::create("overmark.log").context("failed to create log file")?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
