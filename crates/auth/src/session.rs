//! Session manager: the single owner of the current credential.
//!
//! State machine: `Unauthenticated` --login--> `Authenticated` --logout-->
//! `Unauthenticated`. There is no intermediate "logging in" state here; the
//! caller tracks its own in-flight request.

use std::sync::Arc;

use tokio::sync::watch;

use crate::credential::{Credential, CredentialError, CredentialPayload};

/// Derived view of the session.
///
/// `is_authenticated` is computed from the credential rather than stored, so
/// the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    credential: Option<Credential>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

/// Handle to the process-wide session.
///
/// Cheap to clone; every clone observes the same state. Created once at
/// application start and injected into whatever needs the credential.
#[derive(Debug, Clone)]
pub struct SessionManager {
    state: Arc<watch::Sender<AuthState>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { state: Arc::new(tx) }
    }

    /// Store a credential and become authenticated.
    ///
    /// Replaces any credential already held.
    pub fn login(&self, credential: Credential) {
        tracing::info!(
            username = credential.username().unwrap_or_default(),
            "session authenticated"
        );
        self.state.send_replace(AuthState {
            credential: Some(credential),
        });
    }

    /// Decode the login/signup response payload and store it.
    pub fn login_with_payload(&self, payload: CredentialPayload) -> Result<(), CredentialError> {
        let credential = Credential::try_from(payload)?;
        self.login(credential);
        Ok(())
    }

    /// Clear the credential. Calling it while logged out is a no-op.
    pub fn logout(&self) {
        let changed = self
            .state
            .send_if_modified(|state| state.credential.take().is_some());
        if changed {
            tracing::info!("session cleared");
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.state.borrow().credential.clone()
    }

    /// `Bearer <token>` while authenticated, `None` otherwise.
    pub fn auth_header(&self) -> Option<String> {
        self.state.borrow().credential.as_ref().map(Credential::bearer)
    }

    /// Watch session transitions. The receiver sees the current state
    /// immediately and is marked changed on every login/logout.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
