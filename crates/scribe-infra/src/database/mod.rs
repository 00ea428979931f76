//! Entity Store adapters: PostgreSQL via SeaORM, and an in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryStore, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use sea_orm::DbConn;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

#[cfg(feature = "postgres")]
use scribe_core::Repositories;

/// Build the repository bundle backed by one shared PostgreSQL connection pool.
#[cfg(feature = "postgres")]
pub fn postgres_repositories(db: &std::sync::Arc<DbConn>) -> Repositories {
    use std::sync::Arc;

    Repositories {
        users: Arc::new(PostgresUserRepository::new(Arc::clone(db))),
        posts: Arc::new(PostgresPostRepository::new(Arc::clone(db))),
        comments: Arc::new(PostgresCommentRepository::new(Arc::clone(db))),
        categories: Arc::new(PostgresCategoryRepository::new(Arc::clone(db))),
    }
}

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
