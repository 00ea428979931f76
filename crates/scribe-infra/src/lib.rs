//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//! This crate contains the entity store adapters and the authentication services.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL entity store via SeaORM
//!
//! Without `postgres` only the in-memory store is available.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryStore};
