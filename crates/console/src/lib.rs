//! `posadmin-console`
//!
//! **Responsibility:** headless administrative console for a point-of-sale
//! backend.
//!
//! This crate provides:
//! - Login/signup against the backend and a session shared by every screen
//! - One generic CRUD controller, instantiated per resource collection
//! - Order assembly (line accumulation, totals, submission)
//!
//! The backend is the authority; nothing is cached or persisted locally.

pub mod auth_flow;
pub mod config;
pub mod confirm;
pub mod console;
pub mod controller;
pub mod error;
pub mod order_draft;
pub mod resource;
pub mod resources;
pub mod transport;
pub mod types;

pub use auth_flow::{AuthFlow, AuthForm};
pub use config::ConsoleConfig;
pub use confirm::{AssumeYes, Confirm};
pub use console::{Console, ItemScreen};
pub use controller::{ControllerState, CrudController};
pub use error::{ConsoleError, ConsoleResult};
pub use order_draft::{OrderDraft, OrderLines};
pub use resource::{Deletable, Editable, Resource};
pub use transport::{Access, ApiClient, ApiError};
