//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, SnippetStore};
use crate::services::{SnippetManager, SnippetService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Snippet service
    pub snippet_service: Arc<dyn SnippetService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Token clients must present as a bearer token
    pub api_token: Arc<str>,
}

impl AppState {
    /// Wire the production services on top of a database connection.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let repo = Arc::new(SnippetStore::new(database.get_connection()));
        let snippet_service = Arc::new(SnippetManager::new(repo));

        Self::new(snippet_service, database, config.api_token())
    }

    /// Create application state with manually injected services.
    pub fn new(
        snippet_service: Arc<dyn SnippetService>,
        database: Arc<Database>,
        api_token: &str,
    ) -> Self {
        Self {
            snippet_service,
            database,
            api_token: Arc::from(api_token),
        }
    }
}
