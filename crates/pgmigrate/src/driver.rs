//! Database capabilities the migrator needs.
//!
//! Everything a migration run does goes through one [`Transaction`]. Dropping
//! a transaction without committing it must roll it back and release any
//! transaction-scoped lock it holds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::migration::MigrationRecord;

/// Opens transactions against the target database.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DbErr>;
}

/// A single open database transaction.
#[async_trait]
pub trait Transaction: Send {
    /// Take the transaction-scoped advisory lock `key`, waiting until it is free.
    async fn lock(&mut self, key: i64) -> Result<(), DbErr>;

    /// Take the advisory lock `key` if it is free. Never waits.
    async fn try_lock(&mut self, key: i64) -> Result<bool, DbErr>;

    /// Create the bookkeeping table when it does not exist yet.
    async fn ensure_table(&mut self, table: &str) -> Result<(), DbErr>;

    /// Every applied-migration record.
    async fn applied(&mut self, table: &str) -> Result<Vec<MigrationRecord>, DbErr>;

    /// Run one SQL statement.
    async fn execute(&mut self, sql: &str) -> Result<(), DbErr>;

    async fn insert_record(
        &mut self,
        table: &str,
        id: &str,
        applied_at: DateTime<Utc>,
    ) -> Result<(), DbErr>;

    async fn delete_record(&mut self, table: &str, id: &str) -> Result<(), DbErr>;

    async fn savepoint(&mut self, name: &str) -> Result<(), DbErr>;

    async fn release_savepoint(&mut self, name: &str) -> Result<(), DbErr>;

    async fn rollback_to_savepoint(&mut self, name: &str) -> Result<(), DbErr>;

    async fn commit(self: Box<Self>) -> Result<(), DbErr>;

    async fn rollback(self: Box<Self>) -> Result<(), DbErr>;
}
