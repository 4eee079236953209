//! Login and signup screens.
//!
//! Both post `{username, password}` without credentials and hand the
//! response payload to the session manager.

use serde::Serialize;

use posadmin_auth::{CredentialPayload, SessionManager};
use posadmin_core::DomainError;

use crate::error::{ConsoleError, ConsoleResult};
use crate::transport::{Access, ApiClient};

pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/users";

const FIELDS_REQUIRED: &str = "Username and password are required";

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AuthForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(DomainError::validation(FIELDS_REQUIRED));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Login,
    Signup,
}

impl Flow {
    fn path(self) -> &'static str {
        match self {
            Flow::Login => LOGIN_PATH,
            Flow::Signup => SIGNUP_PATH,
        }
    }

    fn failure(self) -> &'static str {
        match self {
            Flow::Login => "There was an error logging in",
            Flow::Signup => "There was an error signing up",
        }
    }
}

/// Drives the login/signup forms against the backend.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    api: ApiClient,
}

impl AuthFlow {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn session(&self) -> &SessionManager {
        self.api.session()
    }

    /// Exchange username/password for a credential and open the session.
    pub async fn login(&self, form: &AuthForm) -> ConsoleResult<()> {
        self.authenticate(Flow::Login, form).await
    }

    /// Register a user; the backend logs the new user straight in.
    pub async fn signup(&self, form: &AuthForm) -> ConsoleResult<()> {
        self.authenticate(Flow::Signup, form).await
    }

    pub fn logout(&self) {
        self.session().logout();
    }

    async fn authenticate(&self, flow: Flow, form: &AuthForm) -> ConsoleResult<()> {
        form.validate()?;

        let body = self
            .api
            .post_json(flow.path(), form, Access::Anonymous)
            .await
            .map_err(|e| {
                tracing::warn!(?flow, username = %form.username, error = %e, "authentication failed");
                ConsoleError::request(flow.failure(), e)
            })?;

        self.session()
            .login_with_payload(CredentialPayload::from_body(&body))
            .map_err(|e| {
                tracing::warn!(?flow, error = %e, "authentication response unusable");
                ConsoleError::Credential {
                    message: flow.failure().to_string(),
                    source: e,
                }
            })
    }
}
