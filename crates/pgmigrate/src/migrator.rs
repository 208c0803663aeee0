//! Applying and reverting migrations under an advisory lock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::driver::{Driver, Transaction};
use crate::error::{MigrateError, MigrateResult};
use crate::migration::{Migration, MigrationRecord, MigrationStatus};
use crate::plan::{plan, Direction};
use crate::source::MigrationSource;

/// Default bookkeeping table name.
pub const DEFAULT_TABLE: &str = "migrations";

/// Default advisory lock key.
pub const DEFAULT_LOCK_KEY: i64 = 1;

/// How often a bounded lock wait retries.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How a run is split into transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionMode {
    /// One transaction for the whole run: either every planned migration
    /// lands or none does.
    #[default]
    Batch,
    /// One savepoint per migration inside the locked transaction. When a
    /// migration or its bookkeeping record fails, the ones before it are
    /// still committed.
    PerMigration,
}

/// Why a locked run stopped early.
enum Halt {
    /// Roll back everything.
    Abort(MigrateError),
    /// Keep what was applied before the failure.
    KeepPrefix(MigrateError),
}

impl From<MigrateError> for Halt {
    fn from(err: MigrateError) -> Self {
        Halt::Abort(err)
    }
}

/// Runs migrations from a [`MigrationSource`] through a [`Driver`].
///
/// Every run takes the advisory lock inside its own transaction before
/// reading the bookkeeping table, so concurrent runs from any number of
/// processes are serialized and each migration is applied exactly once.
pub struct Migrator<D, S> {
    driver: D,
    source: S,
    table: String,
    lock_key: i64,
    lock_timeout: Option<Duration>,
    mode: TransactionMode,
}

impl<D: Driver, S: MigrationSource> Migrator<D, S> {
    pub fn new(driver: D, source: S) -> Self {
        Self {
            driver,
            source,
            table: DEFAULT_TABLE.to_string(),
            lock_key: DEFAULT_LOCK_KEY,
            lock_timeout: None,
            mode: TransactionMode::default(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_lock_key(mut self, key: i64) -> Self {
        self.lock_key = key;
        self
    }

    /// Give up waiting for the lock after `timeout`.
    ///
    /// A bounded wait polls the non-blocking lock instead of parking a query
    /// on the connection, so the transaction can still be rolled back.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    pub fn with_mode(mut self, mode: TransactionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Apply every pending migration. Returns how many were applied.
    pub async fn up(&self) -> MigrateResult<usize> {
        self.run(Direction::Up, 0).await
    }

    /// Revert up to `max_steps` of the most recently applied migrations,
    /// `0` meaning all of them. Returns how many were reverted.
    pub async fn down(&self, max_steps: usize) -> MigrateResult<usize> {
        self.run(Direction::Down, max_steps).await
    }

    /// Every known migration together with when it was applied.
    pub async fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        let migrations = self.source.find_migrations()?;
        let mut txn = self.driver.begin().await.map_err(MigrateError::Begin)?;

        let applied = match self.read_ledger(txn.as_mut()).await {
            Ok(applied) => applied,
            Err(err) => {
                discard(txn).await;
                return Err(err);
            }
        };
        txn.commit().await.map_err(MigrateError::Commit)?;

        let mut applied: HashMap<String, _> = applied
            .into_iter()
            .map(|record| (record.id, record.applied_at))
            .collect();

        let statuses = migrations
            .into_iter()
            .map(|m| MigrationStatus {
                applied_at: applied.remove(&m.id),
                id: m.id,
            })
            .collect();

        for id in applied.keys() {
            tracing::warn!(migration = %id, "Applied migration is missing from the source");
        }

        Ok(statuses)
    }

    async fn run(&self, direction: Direction, max: usize) -> MigrateResult<usize> {
        // Source errors surface before any database work.
        let migrations = self.source.find_migrations()?;

        let mut txn = self.driver.begin().await.map_err(MigrateError::Begin)?;

        match self.run_locked(txn.as_mut(), migrations, direction, max).await {
            Ok(count) => {
                txn.commit().await.map_err(MigrateError::Commit)?;
                tracing::info!(%direction, count, "Migrations finished");
                Ok(count)
            }
            Err(Halt::KeepPrefix(err)) => {
                txn.commit().await.map_err(MigrateError::Commit)?;
                tracing::error!(%direction, error = %err, "Migration failed, earlier migrations kept");
                Err(err)
            }
            Err(Halt::Abort(err)) => {
                discard(txn).await;
                tracing::error!(%direction, error = %err, "Migration failed, run rolled back");
                Err(err)
            }
        }
    }

    async fn run_locked(
        &self,
        txn: &mut dyn Transaction,
        migrations: Vec<Migration>,
        direction: Direction,
        max: usize,
    ) -> Result<usize, Halt> {
        let applied = self.read_ledger(txn).await?;
        let planned = plan(migrations, &applied, direction, max)?;

        if planned.is_empty() {
            tracing::info!(%direction, "No migrations to run");
            return Ok(0);
        }

        for (done, migration) in planned.iter().enumerate() {
            match self.mode {
                TransactionMode::Batch => {
                    self.apply(txn, migration, direction, 0).await?;
                }
                TransactionMode::PerMigration => {
                    let savepoint = format!("pgmigrate_{done}");
                    txn.savepoint(&savepoint)
                        .await
                        .map_err(MigrateError::Bookkeeping)?;

                    match self.apply(txn, migration, direction, done).await {
                        Ok(()) => txn
                            .release_savepoint(&savepoint)
                            .await
                            .map_err(MigrateError::Bookkeeping)?,
                        Err(err) => {
                            txn.rollback_to_savepoint(&savepoint)
                                .await
                                .map_err(MigrateError::Bookkeeping)?;
                            return Err(Halt::KeepPrefix(err));
                        }
                    }
                }
            }
        }

        Ok(planned.len())
    }

    /// Take the lock and read the bookkeeping table.
    async fn read_ledger(
        &self,
        txn: &mut dyn Transaction,
    ) -> MigrateResult<Vec<MigrationRecord>> {
        tracing::debug!(key = self.lock_key, "Acquiring migration lock");
        self.acquire_lock(txn).await?;
        tracing::debug!(key = self.lock_key, "Migration lock acquired");

        txn.ensure_table(&self.table)
            .await
            .map_err(MigrateError::Bookkeeping)?;
        txn.applied(&self.table)
            .await
            .map_err(MigrateError::Bookkeeping)
    }

    async fn acquire_lock(&self, txn: &mut dyn Transaction) -> MigrateResult<()> {
        let Some(limit) = self.lock_timeout else {
            return txn.lock(self.lock_key).await.map_err(MigrateError::Lock);
        };

        let deadline = Instant::now() + limit;
        loop {
            if txn
                .try_lock(self.lock_key)
                .await
                .map_err(MigrateError::Lock)?
            {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(MigrateError::LockTimeout(limit));
            }
            tokio::time::sleep(LOCK_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Run one migration's statements and update its record.
    ///
    /// `kept` is how many migrations stay committed if this one fails.
    async fn apply(
        &self,
        txn: &mut dyn Transaction,
        migration: &Migration,
        direction: Direction,
        kept: usize,
    ) -> MigrateResult<()> {
        tracing::info!(migration = %migration.id, %direction, "Running migration");

        let statements = match direction {
            Direction::Up => &migration.up,
            Direction::Down => &migration.down,
        };

        for statement in statements {
            txn.execute(statement)
                .await
                .map_err(|source| MigrateError::Execution {
                    id: migration.id.clone(),
                    statement: statement.clone(),
                    applied: kept,
                    source,
                })?;
        }

        match direction {
            Direction::Up => txn.insert_record(&self.table, &migration.id, Utc::now()).await,
            Direction::Down => txn.delete_record(&self.table, &migration.id).await,
        }
        .map_err(MigrateError::Bookkeeping)
    }
}

async fn discard(txn: Box<dyn Transaction>) {
    if let Err(e) = txn.rollback().await {
        tracing::warn!(error = %e, "Failed to roll back migration transaction");
    }
}
