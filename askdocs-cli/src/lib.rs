//! Command-line interface for the askdocs assistant.
//!
//! The binary wires configuration from the environment into the
//! `askdocs-rag` pipeline and exposes `index`, `query`, `chat`, `batch`,
//! `info`, and `clear` subcommands.

pub mod commands;
pub mod config;
pub mod setup;

pub use commands::{Cli, Command};
pub use config::AppConfig;
