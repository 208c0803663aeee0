//! Snippet service - Handles snippet use cases.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewSnippet, Snippet};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::SnippetRepository;
use crate::types::Pagination;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Source of the current time
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Snippet service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SnippetService: Send + Sync {
    /// Get snippet by ID, including expired ones
    async fn get(&self, id: i32) -> AppResult<Snippet>;

    /// Store a new snippet
    async fn create(&self, snippet: NewSnippet) -> AppResult<Snippet>;

    /// One page of active snippets, newest first
    async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<Snippet>, Pagination)>;

    /// Mark a snippet as deleted by expiring it now
    async fn soft_delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of SnippetService.
pub struct SnippetManager {
    repo: Arc<dyn SnippetRepository>,
    clock: Clock,
}

impl SnippetManager {
    pub fn new(repo: Arc<dyn SnippetRepository>) -> Self {
        Self {
            repo,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock, e.g. with a fixed instant in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Log a storage failure and hide it behind an internal error.
fn storage_failure(action: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        tracing::error!(error = ?err, "{}", action);
        AppError::internal(action)
    }
}

#[async_trait]
impl SnippetService for SnippetManager {
    async fn get(&self, id: i32) -> AppResult<Snippet> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(storage_failure("failed to get snippet"))?
            .ok_or_not_found()
    }

    async fn create(&self, snippet: NewSnippet) -> AppResult<Snippet> {
        let now = self.now();
        let snippet = self
            .repo
            .create(snippet, now)
            .await
            .map_err(storage_failure("failed to create snippet"))?;

        tracing::debug!(id = snippet.id, "Snippet created");
        Ok(snippet)
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<Snippet>, Pagination)> {
        let now = self.now();
        let total = self
            .repo
            .count_active(now)
            .await
            .map_err(storage_failure("failed to count snippets"))?;

        let pagination = Pagination::new(limit, offset, total);

        let snippets = self
            .repo
            .list(pagination.limit, pagination.offset, now)
            .await
            .map_err(storage_failure("failed to list snippets"))?;

        Ok((snippets, pagination))
    }

    async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let found = self
            .repo
            .soft_delete(id, self.now())
            .await
            .map_err(storage_failure("failed to delete snippet"))?;

        if !found {
            return Err(AppError::NotFound);
        }

        tracing::debug!(id, "Snippet soft-deleted");
        Ok(())
    }
}
