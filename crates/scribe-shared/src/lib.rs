//! # Scribe Shared
//!
//! Wire types shared between the server and its clients.
//! Kept free of domain dependencies so a client can compile it on its own.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
