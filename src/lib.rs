//! TDSE CLI library root.

/// Crate version, surfaced by the `--version` flag.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub type Result<T> = error::TdseResult<T>;

pub mod services;
