//! Versioned SQL migrations for PostgreSQL.
//!
//! Migrations are `.sql` files with `-- +migrate Up` / `-- +migrate Down`
//! sections, read from a [`MigrationSource`]. A [`Migrator`] applies them
//! through a [`Driver`] inside one transaction that first takes a
//! transaction-scoped advisory lock, so concurrent runs are serialized.
//!
//! ```no_run
//! use pgmigrate::{MemorySource, Migrator, PostgresDriver};
//!
//! # async fn run(conn: sea_orm::DatabaseConnection) -> pgmigrate::MigrateResult<()> {
//! let source = MemorySource::from_static(&[(
//!     "1700000000_create_things.sql",
//!     "-- +migrate Up\nCREATE TABLE things (id SERIAL PRIMARY KEY);\n-- +migrate Down\nDROP TABLE things;\n",
//! )]);
//! let applied = Migrator::new(PostgresDriver::new(conn), source).up().await?;
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod error;
pub mod migration;
pub mod migrator;
pub mod parser;
pub mod plan;
pub mod postgres;
pub mod source;

pub use driver::{Driver, Transaction};
pub use error::{MigrateError, MigrateResult};
pub use migration::{compare_ids, Migration, MigrationRecord, MigrationStatus};
pub use migrator::{Migrator, TransactionMode, DEFAULT_LOCK_KEY, DEFAULT_TABLE};
pub use parser::parse_migration;
pub use plan::Direction;
pub use postgres::PostgresDriver;
pub use source::{create, DirSource, MemorySource, MigrationSource, TEMPLATE};
