use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log files older than this are removed
const MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Keeps the file writer alive; hold it until exit
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// `level` when valid, else `info`
pub fn effective_level(level: &str) -> &str {
    if VALID_LEVELS.contains(&level) { level } else { "info" }
}

pub fn init_logging(
    log_dir: impl AsRef<Path>,
    prefix: &str,
    level: &str,
) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let effective = effective_level(level);

    let builder = EnvFilter::builder().with_default_directive(
        effective
            .parse()
            .with_context(|| format!("Invalid log directive '{}'", effective))?,
    );

    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create file appender in {}", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if effective != level {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    start_log_cleanup_task(log_dir, prefix.to_string());

    Ok(LoggerGuard(guard))
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String) {
    tokio::task::spawn(async move {
        loop {
            match cleanup_old_logs(&log_dir, &prefix, MAX_AGE) {
                Ok(0) => {}
                Ok(n) => tracing::info!("Deleted {} old log files", n),
                Err(e) => tracing::warn!("Failed to delete old log file: {}", e),
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// Remove `<prefix>*.log` files older than `max_age`, returning how many
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(file_name.starts_with(prefix) && file_name.ends_with(".log")) {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            tracing::debug!("Old log file deleted: {}", file_name);
            deleted += 1;
        }
    }
    Ok(deleted)
}
