//! Tracing setup. The terminal belongs to the TUI, so events go to a log file
//! (or nowhere) instead of stdout.

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Install the global subscriber described by `settings`.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_new(&settings.log_level)
        .with_context(|| format!("invalid log filter `{}`", settings.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    match &settings.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("failed to create log directory")?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
        }
        None => {
            builder
                .with_writer(io::sink)
                .try_init()
                .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
        }
    }

    Ok(())
}
