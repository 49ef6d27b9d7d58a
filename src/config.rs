//! Startup settings: built-in defaults, overlaid by an optional TOML file, then
//! environment variables, then command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::BlankRatingFilter;

/// Folder name used beneath the user's home directory for config and logs.
const DATA_DIR_NAME: &str = ".movie-catalog";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "movie-catalog.log";

pub const ENV_LOG: &str = "MOVIE_CATALOG_LOG";
pub const ENV_BLANK_RATING: &str = "MOVIE_CATALOG_BLANK_RATING";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown blank rating policy `{0}` (expected match-none or match-all)")]
    InvalidBlankRating(String),
}

/// Command-line flags. Every flag is optional and wins over the file.
#[derive(Parser, Debug, Default)]
#[command(name = "movie-catalog", version, about = "Browse, filter and add movies in the terminal")]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// How an empty rating filter behaves.
    #[arg(long, value_enum)]
    pub blank_rating: Option<BlankRatingFilter>,
    /// Start with an empty catalog instead of the two example movies.
    #[arg(long)]
    pub no_seed: bool,
    /// Where tracing output is written.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Tracing filter directive, e.g. `debug` or `movie_catalog=trace`.
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Shape of the optional config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    blank_rating_filter: Option<BlankRatingFilter>,
    seed_examples: Option<bool>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

/// Resolved settings handed to the app and the logger.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub blank_rating: BlankRatingFilter,
    pub seed_examples: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blank_rating: BlankRatingFilter::MatchNone,
            seed_examples: true,
            log_file: data_dir().map(|dir| dir.join(LOG_FILE_NAME)),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from every source, reading the process environment.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::load_with_env(cli, |key| std::env::var(key).ok())
    }

    /// Same as [`Settings::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(cli: &Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        match &cli.config {
            Some(path) => settings.apply_file(read_file(path)?),
            None => {
                if let Some(path) = default_config_path().filter(|path| path.exists()) {
                    settings.apply_file(read_file(&path)?);
                }
            }
        }

        if let Some(level) = env(ENV_LOG) {
            settings.log_level = level;
        }
        if let Some(raw) = env(ENV_BLANK_RATING) {
            settings.blank_rating = parse_blank_rating(&raw)?;
        }

        if let Some(policy) = cli.blank_rating {
            settings.blank_rating = policy;
        }
        if cli.no_seed {
            settings.seed_examples = false;
        }
        if let Some(path) = &cli.log_file {
            settings.log_file = Some(path.clone());
        }
        if let Some(level) = &cli.log_level {
            settings.log_level = level.clone();
        }

        Ok(settings)
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(policy) = file.blank_rating_filter {
            self.blank_rating = policy;
        }
        if let Some(seed) = file.seed_examples {
            self.seed_examples = seed;
        }
        if let Some(path) = file.log_file {
            self.log_file = Some(path);
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
    }
}

fn read_file(path: &Path) -> Result<FileSettings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_blank_rating(raw: &str) -> Result<BlankRatingFilter, ConfigError> {
    BlankRatingFilter::from_str(raw.trim(), true)
        .map_err(|_| ConfigError::InvalidBlankRating(raw.to_string()))
}

fn data_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(DATA_DIR_NAME))
}

/// `~/.movie-catalog/config.toml`, when a home directory can be located.
pub fn default_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
