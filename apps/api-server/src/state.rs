//! Application state - shared across all handlers.

use scribe_core::Repositories;
use scribe_core::services::{CategoryService, CommentService, PostService, UserService};
use scribe_infra::{DatabaseConfig, InMemoryStore};

#[cfg(feature = "postgres")]
use scribe_infra::database::{self, DbConn};
#[cfg(feature = "postgres")]
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub categories: CategoryService,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DbConn>>,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match database::connect(config).await {
                Ok(conn) => {
                    let conn = Arc::new(conn);
                    let mut state = Self::from_repositories(database::postgres_repositories(&conn));
                    state.db = Some(conn);
                    state
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - DATABASE_URL is ignored");
            }
            Self::in_memory()
        };

        tracing::info!("Application state initialized");
        state
    }

    /// State backed by a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_repositories(InMemoryStore::new().repositories())
    }

    fn from_repositories(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.clone()),
            posts: PostService::new(repos.clone()),
            comments: CommentService::new(repos.clone()),
            categories: CategoryService::new(repos.clone()),
            repos,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
