//! `posadmin-core` — domain building blocks shared by the console crates.
//!
//! This crate contains **pure domain** primitives (no HTTP, no session state).

pub mod entity;
pub mod error;
pub mod id;
pub mod validate;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EntityId, UserId};
