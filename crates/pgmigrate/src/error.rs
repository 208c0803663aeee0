//! Migration error taxonomy.

use std::path::PathBuf;

use sea_orm::DbErr;
use thiserror::Error;

/// Everything that can go wrong while discovering, applying or reverting migrations.
///
/// Variants carry enough context (file, migration id, statement) to point a
/// human at the script that needs fixing. Nothing here is retried.
#[derive(Error, Debug)]
pub enum MigrateError {
    // Source errors
    #[error("read migrations from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse migration {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("invalid migration name {0:?}: only letters, digits, '_' and '-' are allowed")]
    InvalidName(String),

    // Database errors
    #[error("begin db transaction: {0}")]
    Begin(#[source] DbErr),

    #[error("acquire advisory lock: {0}")]
    Lock(#[source] DbErr),

    #[error("acquire advisory lock: timed out after {0:?}")]
    LockTimeout(std::time::Duration),

    #[error("migrations table: {0}")]
    Bookkeeping(#[source] DbErr),

    #[error("unknown migration in database: {0}")]
    UnknownMigration(String),

    #[error("execute migration {id} (applied {applied} before failure): {source}")]
    Execution {
        id: String,
        statement: String,
        applied: usize,
        #[source]
        source: DbErr,
    },

    #[error("commit db transaction: {0}")]
    Commit(#[source] DbErr),
}

impl MigrateError {
    pub(crate) fn parse(file: impl Into<String>, reason: impl Into<String>) -> Self {
        MigrateError::Parse {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MigrateError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the lock acquisition failures (`Lock` and `LockTimeout`).
    pub fn is_lock_error(&self) -> bool {
        matches!(self, MigrateError::Lock(_) | MigrateError::LockTimeout(_))
    }
}

/// Result type alias
pub type MigrateResult<T> = Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_mentions_migration() {
        let err = MigrateError::Execution {
            id: "200_b.sql".to_string(),
            statement: "CREATE TABLE b ();".to_string(),
            applied: 1,
            source: DbErr::Custom("syntax error".to_string()),
        };

        let msg = err.to_string();
        assert!(msg.contains("200_b.sql"));
        assert!(msg.contains("applied 1"));
    }

    #[test]
    fn test_lock_errors() {
        assert!(MigrateError::Lock(DbErr::Custom("cancelled".into())).is_lock_error());
        assert!(MigrateError::LockTimeout(std::time::Duration::from_secs(1)).is_lock_error());
        assert!(!MigrateError::Commit(DbErr::Custom("x".into())).is_lock_error());
    }
}
