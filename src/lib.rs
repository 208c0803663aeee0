//! Snippets API - Starter REST service with embedded SQL migrations
//!
//! A small but complete service to start new projects from: one
//! "snippet" resource served over HTTP, stored in PostgreSQL, with the
//! schema managed by the `pgmigrate` crate.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities
//! - **services**: Application use cases
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -- server --token secret
//!
//! # Manage migrations
//! cargo run -- migrate create add_tags
//! cargo run -- migrate up
//! cargo run -- migrate down --steps 1
//! cargo run -- migrate status
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{NewSnippet, Snippet};
pub use errors::{AppError, AppResult};
