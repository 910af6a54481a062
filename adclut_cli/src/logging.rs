//! Tracing setup: console layer on stderr plus an optional JSON-lines file.

use crate::cli::{FILE_GUARD, LogLevel};
use adclut_config::Logging;
use eyre::WrapErr;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Level precedence: `RUST_LOG`, then `--log-level`, then `[logging].level`, then info.
/// `[logging].level` is already checked by `Config::validate`.
pub fn init(cli_level: Option<LogLevel>, json: bool, cfg: &Logging) -> eyre::Result<()> {
    let level = cli_level
        .map(LogLevel::as_str)
        .or(cfg.level.as_deref())
        .unwrap_or("info");
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => {
            EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level {level:?}"))?
        }
    };

    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let file = match cfg.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {:?} has no file name", path))?;
            let appender = match cfg.rotation.as_deref().map(str::to_ascii_lowercase).as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| eyre::eyre!("init logging: {e}"))
}
