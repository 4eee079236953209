//! `posadmin-auth` — client-side authentication state.
//!
//! This crate is intentionally decoupled from HTTP: it stores what the login
//! endpoint handed back and derives the request header from it. It never
//! contacts the network.

pub mod credential;
pub mod session;

pub use credential::{Credential, CredentialError, CredentialPayload};
pub use session::{AuthState, SessionManager};
