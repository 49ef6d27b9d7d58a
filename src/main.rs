//! Binary entry point: resolve settings, install logging, build the app, and
//! drive the Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use movie_catalog::{init_logging, run_app, App, Cli, Settings};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli).context("failed to load configuration")?;
    init_logging(&settings)?;
    tracing::info!(?settings, "starting movie catalog");

    let mut app = App::from_settings(&settings);
    run_app(&mut app)
}
