//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `server` - Apply migrations and start the HTTP server
//! - `migrate` - Create, apply, revert and inspect migrations

pub mod args;

pub use args::{Cli, Commands};
