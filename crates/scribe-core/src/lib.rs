//! # Scribe Core
//!
//! The domain layer of the Scribe content API: posts, comments and
//! categories owned by users, and the rule deciding who may change them.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
pub use services::Repositories;
