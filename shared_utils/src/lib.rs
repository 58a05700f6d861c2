//! Small helpers shared by the workspace crates.

pub mod env;

pub use env::{EnvVarError, get_env_parsed, get_env_var, get_optional_env_var};
