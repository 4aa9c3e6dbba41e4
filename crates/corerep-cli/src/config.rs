//! Run configuration of the `compute` command.
//!
//! Values are merged with the precedence CLI flag > `--set` > config file > built-in
//! default.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::{AppConfig, ParameterSource};
