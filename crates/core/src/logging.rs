//! Tracing setup shared by every `goscope` entry point.
//!
//! Each component (`shell`, `serve`, `cli`) writes a daily file of its own;
//! the interactive shell keeps the terminal clean and only logs to file.

use std::ffi::OsString;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the log directory when set.
pub const LOG_DIR_ENV: &str = "GOSCOPE_LOG_DIR";
const DEFAULT_FILTER: &str = "info";

/// `$GOSCOPE_LOG_DIR`, else `~/.goscope/logs`, else `.goscope/logs`.
pub fn log_dir() -> PathBuf {
    resolve_log_dir(std::env::var_os(LOG_DIR_ENV), dirs::home_dir())
}

fn resolve_log_dir(overridden: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    match overridden.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".goscope")
            .join("logs"),
    }
}

/// Installs the global subscriber: `RUST_LOG` (default `info`), a daily
/// file named after `component`, and stderr when `to_stderr` is set.
/// The returned guard flushes the file writer when dropped.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create log directory {}: {}", dir.display(), e);
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, component));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    if tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        eprintln!("a tracing subscriber is already installed; keeping it");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_prefers_override() {
        let dir = resolve_log_dir(Some("/var/log/goscope".into()), Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/var/log/goscope"));
    }

    #[test]
    fn log_dir_falls_back_to_home() {
        let dir = resolve_log_dir(Some(OsString::new()), Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/home/me/.goscope/logs"));
        assert_eq!(resolve_log_dir(None, None), PathBuf::from("./.goscope/logs"));
    }
}
