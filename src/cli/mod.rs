//! CLI - argument definitions and subcommand implementations.

pub mod args;
mod common;
pub mod match_url;
pub mod tree;
pub mod urls;
pub mod validate;

pub use args::{Cli, Commands};
