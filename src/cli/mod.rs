//! Command-line interface module.

mod args;
pub mod bundle;
pub mod cleanup;

pub use args::{Cli, Commands, RunArgs};
