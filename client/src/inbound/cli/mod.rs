//! Terminal driver for the signup flow.
//!
//! Settings come from OrthoConfig, arguments from clap, and the view-layer
//! ports render to the terminal.

mod args;
mod commands;
mod config;
mod terminal;

pub use args::{CliArgs, Command};
pub use commands::{
    CommandError, execute, render_controls, render_ledger, render_publications, run,
};
pub use config::SignupSettings;
pub use terminal::{TerminalNavigator, TerminalNotifier, level_tag};
