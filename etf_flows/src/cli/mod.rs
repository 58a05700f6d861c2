//! Command-line front end (`etf-flows`).

pub mod commands;
mod render;
mod run;

pub use commands::{Cli, Commands, OutputFormat};
pub use run::{CONFIG_ENV_VAR, run};
