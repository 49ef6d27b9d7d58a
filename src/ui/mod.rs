//! Ratatui front-end: the app state machine, the form and filter inputs, the
//! card listing, and the terminal loop that drives them.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, Mode};
pub use forms::{EntryField, EntryForm, FilterChange, FilterField, FilterPanel};
pub use terminal::run_app;
