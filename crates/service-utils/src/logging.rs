use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Human-readable lines go to stdout (or stderr when `log_to_stderr` is set).
/// When `log_dir` is given, a daily-rolling JSON log named `<service>.log` is
/// written there as well; keep the returned guard alive until shutdown so
/// buffered lines are flushed.
pub fn init_tracing(
    service: &str,
    log_dir: Option<&Path>,
    log_to_stderr: bool,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, format!("{service}.log"));
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_target(false)
                .json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if log_to_stderr {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false);
        registry.with(stderr_layer).try_init()?;
    } else {
        let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
        registry.with(stdout_layer).try_init()?;
    }

    Ok(file_guard)
}
