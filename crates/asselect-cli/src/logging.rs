use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use asselect_core::session_log::SESSION_TARGET;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the stderr filter directives
pub const LOG_ENV: &str = "ASSELECT_LOG";

/// Install the global subscriber.
///
/// Diagnostics go to stderr, filtered by `ASSELECT_LOG` (default `warn`, or
/// `info` with `--verbose`). When `session_dir` is given, session records are
/// also written to a fresh `session_<timestamp>.log` there. The returned guard
/// must live until exit so the file is flushed.
pub fn init(verbose: bool, session_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let default_filter = if verbose { "info" } else { "warn" };
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| default_filter.to_string());
    let filter_layer = EnvFilter::try_new(&filter)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Failed to build log filter")?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(filter_layer);

    let Some(dir) = session_dir else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    };

    let path = session_file(dir)?;
    let file_name = path
        .file_name()
        .context("Session log path has no file name")?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let session_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_filter(Targets::new().with_target(SESSION_TARGET, Level::INFO));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(session_layer)
        .init();

    tracing::debug!(path = %path.display(), "Session log opened");
    Ok(Some(guard))
}

fn session_file(dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    Ok(dir.join(format!("session_{stamp}.log")))
}
