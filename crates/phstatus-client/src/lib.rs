//! CLI, configuration and the run pipeline
//!
//! This crate provides the `phstatus` command-line interface, which sets the
//! Slack status for today's or an upcoming public holiday.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use pipeline::{Collaborators, RunOutcome, RunSettings, run_once};
