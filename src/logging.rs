use anyhow::Context;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable consulted for filter directives before `RUST_LOG`
const LOG_ENV: &str = "MOODLOG_LOG";

const LOG_FILE: &str = "moodlog.log";

const DEFAULT_DIRECTIVES: &str = "moodlog=info";

/// Sends `tracing` events to a log file in `data_dir`, truncating any previous
/// log.  The terminal belongs to the UI, so nothing is ever written to stdout
/// or stderr.
pub(crate) fn init(data_dir: &Path, configured: Option<&str>) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    let log_path = data_dir.join(LOG_FILE);
    let log_file = File::create(&log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;
    let directives = directives(|var| std::env::var(var).ok(), configured);
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?}"))?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter);
    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(log_path)
}

fn directives<F>(getenv: F, configured: Option<&str>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .filter_map(getenv)
        .chain(configured.map(String::from))
        .find(|d| !d.trim().is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_DIRECTIVES))
}
