//! Argument parsing, log setup, and subcommands for the `forum-id` binary.
//!
//! - [`config`] - `clap` arguments and the validated [`config::CliConfig`].
//! - [`telemetry`] - `tracing-subscriber` setup.
//! - [`commands`] - subcommand implementations.

pub mod commands;
pub mod config;
pub mod telemetry;
