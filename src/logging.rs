//! Tracing configuration and log routing.
//!
//! Logs go to stdout through a compact formatter and are mirrored to a file: the configured
//! `log_file` when one is set, otherwise `logs/student-api.log`. The file writer is non-blocking
//! so request handlers never wait on disk.
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "student-api.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and file logging.
///
/// `RUST_LOG` controls filtering and defaults to `info,tower_http=debug` so request spans are
/// visible out of the box.
pub fn init_tracing(log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match file_writer(log_file) {
        Ok(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        Err(err) => {
            registry.init();
            tracing::warn!(error = %err, "File logging disabled");
        }
    }
}

/// Open the log target and wrap it in a non-blocking writer kept alive by [`LOG_GUARD`].
fn file_writer(log_file: Option<&Path>) -> io::Result<NonBlocking> {
    let (non_blocking, guard) = match log_file {
        Some(path) => tracing_appender::non_blocking(open_append(path)?),
        None => {
            fs::create_dir_all(DEFAULT_LOG_DIR)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(
                DEFAULT_LOG_DIR,
                DEFAULT_LOG_FILE,
            ))
        }
    };
    let _ = LOG_GUARD.set(guard);
    Ok(non_blocking)
}

fn open_append(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_log_file_is_created_with_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("service.log");

        open_append(&path).expect("open log file");
        assert!(path.is_file());
    }

    #[test]
    fn unwritable_log_target_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(open_append(dir.path()).is_err());
    }
}
