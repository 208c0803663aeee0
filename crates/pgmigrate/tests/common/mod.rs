//! In-memory database used to exercise the migrator.
//!
//! `FakeDriver` behaves like PostgreSQL for everything the migrator relies on:
//! transactions see committed data once they hold the lock, uncommitted work
//! is discarded on rollback or drop, savepoints restore earlier state, and the
//! advisory lock is held until the transaction ends.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use tokio::sync::OwnedMutexGuard;

use pgmigrate::{Driver, MemorySource, MigrationRecord, Transaction};

/// Committed database contents.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub tables: BTreeMap<String, BTreeMap<String, DateTime<Utc>>>,
    /// Every statement that took effect, in order.
    pub executed: Vec<String>,
}

/// One entry of the event log: transaction number and what it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub txn: usize,
    pub kind: String,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    events: Mutex<Vec<Event>>,
    lock: Arc<tokio::sync::Mutex<()>>,
    next_txn: AtomicUsize,
    fail_on: Mutex<Option<String>>,
    fail_record: Mutex<Option<String>>,
    statement_delay: Mutex<Option<Duration>>,
}

#[derive(Clone, Default)]
pub struct FakeDriver {
    shared: Arc<Shared>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every statement containing `needle` fail.
    pub fn fail_on(&self, needle: &str) {
        *self.shared.fail_on.lock().unwrap() = Some(needle.to_string());
    }

    /// Make recording migration `id` as applied fail.
    pub fn fail_record(&self, id: &str) {
        *self.shared.fail_record.lock().unwrap() = Some(id.to_string());
    }

    pub fn clear_failure(&self) {
        *self.shared.fail_on.lock().unwrap() = None;
        *self.shared.fail_record.lock().unwrap() = None;
    }

    /// Sleep before each statement so concurrent runs get a chance to overlap.
    pub fn slow_statements(&self, delay: Duration) {
        *self.shared.statement_delay.lock().unwrap() = Some(delay);
    }

    pub fn state(&self) -> State {
        self.shared.state.lock().unwrap().clone()
    }

    /// Applied ids recorded in `table`, sorted.
    pub fn records(&self, table: &str) -> Vec<String> {
        self.state()
            .tables
            .get(table)
            .map(|rows| rows.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn executed(&self) -> Vec<String> {
        self.state().executed
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.events.lock().unwrap().clone()
    }

    pub fn is_locked(&self) -> bool {
        self.shared.lock.try_lock().is_err()
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DbErr> {
        let id = self.shared.next_txn.fetch_add(1, Ordering::SeqCst);
        let txn = FakeTransaction {
            id,
            shared: self.shared.clone(),
            working: None,
            savepoints: Vec::new(),
            guard: None,
        };
        txn.log("begin");
        Ok(Box::new(txn))
    }
}

pub struct FakeTransaction {
    id: usize,
    shared: Arc<Shared>,
    working: Option<State>,
    savepoints: Vec<(String, State)>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl FakeTransaction {
    fn log(&self, kind: impl Into<String>) {
        self.shared.events.lock().unwrap().push(Event {
            txn: self.id,
            kind: kind.into(),
        });
    }

    /// Read committed data on first use.
    fn working(&mut self) -> &mut State {
        let shared = &self.shared;
        self.working
            .get_or_insert_with(|| shared.state.lock().unwrap().clone())
    }

    fn table(&mut self, table: &str) -> Result<&mut BTreeMap<String, DateTime<Utc>>, DbErr> {
        self.working()
            .tables
            .get_mut(table)
            .ok_or_else(|| DbErr::Custom(format!("relation \"{table}\" does not exist")))
    }
}

#[async_trait]
impl Transaction for FakeTransaction {
    async fn lock(&mut self, _key: i64) -> Result<(), DbErr> {
        let guard = self.shared.lock.clone().lock_owned().await;
        self.guard = Some(guard);
        self.log("locked");
        Ok(())
    }

    async fn try_lock(&mut self, _key: i64) -> Result<bool, DbErr> {
        match self.shared.lock.clone().try_lock_owned() {
            Ok(guard) => {
                self.guard = Some(guard);
                self.log("locked");
                Ok(true)
            }
            Err(_) => {
                self.log("lock busy");
                Ok(false)
            }
        }
    }

    async fn ensure_table(&mut self, table: &str) -> Result<(), DbErr> {
        self.working().tables.entry(table.to_string()).or_default();
        Ok(())
    }

    async fn applied(&mut self, table: &str) -> Result<Vec<MigrationRecord>, DbErr> {
        Ok(self
            .table(table)?
            .iter()
            .map(|(id, applied_at)| MigrationRecord {
                id: id.clone(),
                applied_at: *applied_at,
            })
            .collect())
    }

    async fn execute(&mut self, sql: &str) -> Result<(), DbErr> {
        let delay = *self.shared.statement_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.log(format!("exec {sql}"));
        let fail_on = self.shared.fail_on.lock().unwrap().clone();
        if let Some(needle) = fail_on {
            if sql.contains(&needle) {
                return Err(DbErr::Custom(format!("syntax error in {sql:?}")));
            }
        }

        self.working().executed.push(sql.to_string());
        Ok(())
    }

    async fn insert_record(
        &mut self,
        table: &str,
        id: &str,
        applied_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let fail_record = self.shared.fail_record.lock().unwrap().clone();
        if fail_record.as_deref() == Some(id) {
            return Err(DbErr::Custom(format!("cannot record {id:?}")));
        }

        let rows = self.table(table)?;
        if rows.contains_key(id) {
            return Err(DbErr::Custom(format!("duplicate key value {id:?}")));
        }
        rows.insert(id.to_string(), applied_at);
        Ok(())
    }

    async fn delete_record(&mut self, table: &str, id: &str) -> Result<(), DbErr> {
        self.table(table)?.remove(id);
        Ok(())
    }

    async fn savepoint(&mut self, name: &str) -> Result<(), DbErr> {
        let snapshot = self.working().clone();
        self.savepoints.push((name.to_string(), snapshot));
        Ok(())
    }

    async fn release_savepoint(&mut self, name: &str) -> Result<(), DbErr> {
        match self.savepoints.iter().rposition(|(n, _)| n == name) {
            Some(index) => {
                self.savepoints.truncate(index);
                Ok(())
            }
            None => Err(DbErr::Custom(format!("savepoint {name:?} does not exist"))),
        }
    }

    async fn rollback_to_savepoint(&mut self, name: &str) -> Result<(), DbErr> {
        match self.savepoints.iter().rposition(|(n, _)| n == name) {
            Some(index) => {
                let snapshot = self.savepoints[index].1.clone();
                self.savepoints.truncate(index + 1);
                self.working = Some(snapshot);
                Ok(())
            }
            None => Err(DbErr::Custom(format!("savepoint {name:?} does not exist"))),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), DbErr> {
        let mut this = *self;
        if let Some(working) = this.working.take() {
            *this.shared.state.lock().unwrap() = working;
        }
        this.log("commit");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbErr> {
        self.log("rollback");
        Ok(())
    }
}

/// `count` migrations `1_m1.sql` .. `<count>_m<count>.sql`, each creating a table.
pub fn numbered_source(count: usize) -> MemorySource {
    (1..=count).fold(MemorySource::new(), |source, n| {
        source.with_file(
            format!("{n}_m{n}.sql"),
            format!(
                "-- +migrate Up\nCREATE TABLE t{n} (id INT);\n-- +migrate Down\nDROP TABLE t{n};\n"
            ),
        )
    })
}

/// The three-file example used across the tests.
pub fn abc_source() -> MemorySource {
    MemorySource::from_static(&[
        (
            "100_a.sql",
            "-- +migrate Up\nCREATE TABLE a (id INT);\n-- +migrate Down\nDROP TABLE a;\n",
        ),
        (
            "200_b.sql",
            "-- +migrate Up\nCREATE TABLE b (id INT);\n-- +migrate Down\nDROP TABLE b;\n",
        ),
        (
            "300_c.sql",
            "-- +migrate Up\nCREATE TABLE c (id INT);\n-- +migrate Down\nDROP TABLE c;\n",
        ),
    ])
}
