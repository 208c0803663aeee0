//! Application configuration module
//!
//! Turns parsed command-line arguments into runtime settings and holds
//! application-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, DatabaseConfig};
