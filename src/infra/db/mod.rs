//! Database connection and migrations.

use pgmigrate::{DirSource, MigrationSource, Migrator, PostgresDriver};
use sea_orm::{Database as SeaDatabase, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

pub mod migrations;

/// Migrator over the configured source and connection
pub type SchemaMigrator = Migrator<PostgresDriver, Box<dyn MigrationSource>>;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open a connection pool. Migrations are not run.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(config.url()).await?;
        tracing::info!("Database connected");
        Ok(Self { connection })
    }

    /// Wrap an existing connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Build a migrator for this connection.
    ///
    /// Uses the embedded migrations unless a migrations directory is configured.
    pub fn migrator(&self, config: &DatabaseConfig) -> SchemaMigrator {
        let source: Box<dyn MigrationSource> = match &config.migrations_dir {
            Some(dir) => {
                tracing::debug!(dir = %dir.display(), "Using migrations directory");
                Box::new(DirSource::new(dir.clone()))
            }
            None => Box::new(migrations::embedded()),
        };

        let migrator = Migrator::new(PostgresDriver::new(self.get_connection()), source)
            .with_mode(config.transaction_mode);

        match config.lock_timeout {
            Some(timeout) => migrator.with_lock_timeout(timeout),
            None => migrator,
        }
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}
