//! PostgreSQL driver on top of a sea-orm connection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, Statement,
    TransactionTrait, Value,
};

use crate::driver::{Driver, Transaction};
use crate::migration::MigrationRecord;

/// [`Driver`] for PostgreSQL.
///
/// The lock is `pg_advisory_xact_lock`, so it is released by PostgreSQL itself
/// when the transaction ends, whether by commit, rollback or a dropped
/// connection.
#[derive(Clone)]
pub struct PostgresDriver {
    conn: DatabaseConnection,
}

impl PostgresDriver {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DbErr> {
        let txn = self.conn.begin().await?;
        Ok(Box::new(PostgresTransaction { txn }))
    }
}

struct PostgresTransaction {
    txn: DatabaseTransaction,
}

impl PostgresTransaction {
    async fn exec_with(&self, sql: &str, values: Vec<Value>) -> Result<(), DbErr> {
        self.txn
            .execute(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Transaction for PostgresTransaction {
    async fn lock(&mut self, key: i64) -> Result<(), DbErr> {
        self.exec_with("SELECT pg_advisory_xact_lock($1)", vec![key.into()])
            .await
    }

    async fn try_lock(&mut self, key: i64) -> Result<bool, DbErr> {
        let row = self
            .txn
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT pg_try_advisory_xact_lock($1) AS locked",
                vec![key.into()],
            ))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("pg_try_advisory_xact_lock".to_string()))?;
        row.try_get::<bool>("", "locked")
    }

    async fn ensure_table(&mut self, table: &str) -> Result<(), DbErr> {
        self.txn
            .execute_unprepared(&format!(
                "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, applied_at TIMESTAMPTZ NOT NULL)",
                quote_ident(table)
            ))
            .await?;
        Ok(())
    }

    async fn applied(&mut self, table: &str) -> Result<Vec<MigrationRecord>, DbErr> {
        let rows = self
            .txn
            .query_all(Statement::from_string(
                DbBackend::Postgres,
                format!("SELECT id, applied_at FROM {} ORDER BY id", quote_ident(table)),
            ))
            .await?;

        rows.iter()
            .map(|row| {
                Ok(MigrationRecord {
                    id: row.try_get::<String>("", "id")?,
                    applied_at: row.try_get::<DateTime<Utc>>("", "applied_at")?,
                })
            })
            .collect()
    }

    async fn execute(&mut self, sql: &str) -> Result<(), DbErr> {
        self.txn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn insert_record(
        &mut self,
        table: &str,
        id: &str,
        applied_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let sql = format!(
            "INSERT INTO {} (id, applied_at) VALUES ($1, $2)",
            quote_ident(table)
        );
        self.exec_with(&sql, vec![id.into(), applied_at.into()])
            .await
    }

    async fn delete_record(&mut self, table: &str, id: &str) -> Result<(), DbErr> {
        let sql = format!("DELETE FROM {} WHERE id = $1", quote_ident(table));
        self.exec_with(&sql, vec![id.into()]).await
    }

    async fn savepoint(&mut self, name: &str) -> Result<(), DbErr> {
        self.execute(&format!("SAVEPOINT {}", quote_ident(name)))
            .await
    }

    async fn release_savepoint(&mut self, name: &str) -> Result<(), DbErr> {
        self.execute(&format!("RELEASE SAVEPOINT {}", quote_ident(name)))
            .await
    }

    async fn rollback_to_savepoint(&mut self, name: &str) -> Result<(), DbErr> {
        self.execute(&format!("ROLLBACK TO SAVEPOINT {}", quote_ident(name)))
            .await
    }

    async fn commit(self: Box<Self>) -> Result<(), DbErr> {
        let this = *self;
        this.txn.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbErr> {
        let this = *self;
        this.txn.rollback().await
    }
}

/// Quote an SQL identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("migrations"), "\"migrations\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
