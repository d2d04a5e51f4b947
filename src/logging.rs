// Logger setup. Events go to a log file through a non-blocking writer so
// they never interleave with the interactive prompts on the terminal.
// When the log directory cannot be created, events fall back to stderr.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::errors::ClientError;

pub const LOG_FILE_NAME: &str = "record-cli.log";

/// Keeps the background writer alive; drop it only at process exit.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Where log events end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    File(PathBuf),
    Stderr { reason: String },
}

fn open_writer(dir: &Path) -> (NonBlocking, WorkerGuard, LogSink) {
    match std::fs::create_dir_all(dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = non_blocking(appender);
            (writer, guard, LogSink::File(dir.join(LOG_FILE_NAME)))
        }
        Err(e) => {
            let (writer, guard) = non_blocking(std::io::stderr());
            let reason = format!("cannot create {}: {e}", dir.display());
            (writer, guard, LogSink::Stderr { reason })
        }
    }
}

pub fn init_logging(cfg: &LoggingConfig) -> Result<LoggingGuard, ClientError> {
    let (writer, guard, sink) = open_writer(&cfg.log_dir);
    let filter = std::env::var("RUST_LOG")
        .ok()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(cfg.filter_directives.clone()));

    let time = fmt::time::UtcTime::rfc_3339();
    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_timer(time)
        .with_ansi(false)
        .with_target(cfg.include_target)
        .with_file(cfg.include_file_line)
        .with_line_number(cfg.include_file_line);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    let installed = match cfg.format {
        LogFormat::Json => registry
            .with(fmt_layer.json().flatten_event(true).with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt_layer).try_init(),
    };
    installed.map_err(|e| ClientError::Config(format!("init logging: {e}")))?;

    match &sink {
        LogSink::File(path) => tracing::debug!(file = %path.display(), "logging initialised"),
        LogSink::Stderr { reason } => tracing::warn!(%reason, "log file unavailable, logging to stderr"),
    }
    Ok(LoggingGuard { _worker: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_dir_gets_a_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let (_writer, _guard, sink) = open_writer(&dir);
        assert_eq!(sink, LogSink::File(dir.join(LOG_FILE_NAME)));
        assert!(dir.is_dir());
    }

    #[test]
    fn unusable_dir_falls_back_to_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let (_writer, _guard, sink) = open_writer(&blocker.join("logs"));
        match sink {
            LogSink::Stderr { reason } => assert!(reason.contains("not-a-dir")),
            other => panic!("expected stderr fallback, got {other:?}"),
        }
    }
}
