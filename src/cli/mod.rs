//! Command-line interface
//!
//! Thin wrapper over the engine: parse arguments, load config and state,
//! run the requested command, print messages as JSON lines.

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
