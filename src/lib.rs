//! Core library surface for the movie catalog TUI.
//!
//! The binary only parses flags, installs logging, and hands an [`App`] to the
//! terminal loop; everything else lives here so tests can drive it directly.
pub mod catalog;
pub mod config;
pub mod logging;
pub mod models;
pub mod ui;

/// The catalog store and its pure filtering projection.
pub use catalog::{apply_criteria, recompute, BlankRatingFilter, Catalog};

pub use config::{Cli, ConfigError, Settings};
pub use logging::init_logging;

/// Domain types shared by the store and the UI.
pub use models::{parse_rating, seed_movies, FilterCriteria, MovieRecord};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
