//! Veritas terminal frontend.
//!
//! Draws the analysis form with ratatui and drives it from crossterm events.
//! The `veritas` binary also exposes one-shot `analyze` and `theme` commands.

pub mod app;
pub mod cli;
pub mod commands;
pub mod input;
pub mod logging;
pub mod palette;
pub mod terminal;
pub mod widgets;

pub use app::App;
pub use cli::{Cli, Commands, ThemeAction};
