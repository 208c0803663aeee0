//! Infrastructure layer - External systems integration
//!
//! Database connections, schema migrations and repositories.

pub mod db;
pub mod repositories;

pub use db::{Database, SchemaMigrator};
pub use repositories::{SnippetRepository, SnippetStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockSnippetRepository;
