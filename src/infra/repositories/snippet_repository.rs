//! Snippet repository implementation.
//!
//! Snippets are soft-deleted: deleting one moves its `expires_at` to the
//! deletion time, and listings only return snippets that have not expired.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::snippet::{self, ActiveModel, Entity as SnippetEntity};
use crate::domain::{NewSnippet, Snippet};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Snippet repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Find snippet by ID, expired or not
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Snippet>>;

    /// Insert a snippet created at `now`
    async fn create(&self, snippet: NewSnippet, now: DateTime<Utc>) -> AppResult<Snippet>;

    /// Snippets not yet expired at `now`, newest first
    async fn list(&self, limit: u64, offset: u64, now: DateTime<Utc>) -> AppResult<Vec<Snippet>>;

    /// Number of snippets not yet expired at `now`
    async fn count_active(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Expire a snippet at `now`. Returns false when no snippet has this ID.
    async fn soft_delete(&self, id: i32, now: DateTime<Utc>) -> AppResult<bool>;
}

/// Concrete implementation of SnippetRepository
pub struct SnippetStore {
    db: DatabaseConnection,
}

impl SnippetStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnippetRepository for SnippetStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Snippet>> {
        let result = SnippetEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Snippet::from))
    }

    async fn create(&self, snippet: NewSnippet, now: DateTime<Utc>) -> AppResult<Snippet> {
        let active_model = ActiveModel {
            id: NotSet,
            title: Set(snippet.title),
            content: Set(snippet.content),
            created_at: Set(now),
            updated_at: Set(now),
            expires_at: Set(snippet.expires_at),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Snippet::from(model))
    }

    async fn list(&self, limit: u64, offset: u64, now: DateTime<Utc>) -> AppResult<Vec<Snippet>> {
        let models = SnippetEntity::find()
            .filter(snippet::Column::ExpiresAt.gt(now))
            .order_by_desc(snippet::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Snippet::from).collect())
    }

    async fn count_active(&self, now: DateTime<Utc>) -> AppResult<u64> {
        SnippetEntity::find()
            .filter(snippet::Column::ExpiresAt.gt(now))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn soft_delete(&self, id: i32, now: DateTime<Utc>) -> AppResult<bool> {
        let result = SnippetEntity::update_many()
            .col_expr(snippet::Column::ExpiresAt, Expr::value(now))
            .col_expr(snippet::Column::UpdatedAt, Expr::value(now))
            .filter(snippet::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    fn model(id: i32) -> snippet::Model {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        snippet::Model {
            id,
            title: format!("Snippet #{id}"),
            content: "text".to_string(),
            created_at: created,
            updated_at: created,
            expires_at: created + chrono::Duration::days(30),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(3)]])
            .into_connection();
        let store = SnippetStore::new(db);

        let snippet = store.find_by_id(3).await.unwrap().unwrap();
        assert_eq!(snippet.id, 3);
        assert_eq!(snippet.title, "Snippet #3");
    }

    #[tokio::test]
    async fn test_soft_delete_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let store = SnippetStore::new(db);
        let now = Utc::now();

        assert!(store.soft_delete(1, now).await.unwrap());
        assert!(!store.soft_delete(2, now).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_expired_and_orders_newest_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(2), model(1)]])
            .into_connection();
        let store = SnippetStore::new(db);
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let snippets = store.list(10, 20, now).await.unwrap();
        assert_eq!(snippets.len(), 2);

        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(log.contains("expires_at"), "{log}");
        assert!(log.contains("created_at") && log.contains("DESC"), "{log}");
        assert!(log.contains("LIMIT") && log.contains("OFFSET"), "{log}");
    }
}
