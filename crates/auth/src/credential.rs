//! Bearer credential issued by the backend at login/signup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use posadmin_core::UserId;

/// Opaque bearer token plus whatever identity claims came with it.
///
/// The token is never interpreted on the client; it is echoed back in the
/// `Authorization` header until logout.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    token: String,
    user_id: Option<UserId>,
    username: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: None,
            username: None,
        }
    }

    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("login response carried no token")]
    MissingToken,
}

/// Body returned by `POST /auth/login` and `POST /users`.
///
/// Backends differ in how they wrap the token: a bare JSON string, or an
/// object with the token under one of a few common keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialPayload {
    Token(String),
    Claims(TokenClaims),
}

const TOKEN_KEYS: [&str; 4] = ["token", "jwtToken", "accessToken", "jwt"];
const USER_ID_KEYS: [&str; 2] = ["userId", "id"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    pub token: Option<String>,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
}

impl TokenClaims {
    /// Pick the known claims out of a JSON value. Claims of an unexpected
    /// type are dropped; they never fail the decode.
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            token: TOKEN_KEYS.iter().find_map(|key| text(*key)),
            user_id: USER_ID_KEYS
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_i64))
                .map(UserId::from_raw),
            username: text("username"),
        }
    }
}

impl CredentialPayload {
    /// Decode a raw response body.
    ///
    /// A body that is not JSON at all is taken as a plain-text token, which
    /// is what token endpoints returning `text/plain` produce.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::String(token)) => CredentialPayload::Token(token),
            Ok(value) => CredentialPayload::Claims(TokenClaims::from_value(&value)),
            Err(_) => CredentialPayload::Token(body.trim().to_string()),
        }
    }
}

impl TryFrom<CredentialPayload> for Credential {
    type Error = CredentialError;

    fn try_from(payload: CredentialPayload) -> Result<Self, Self::Error> {
        match payload {
            CredentialPayload::Token(token) if !token.trim().is_empty() => Ok(Credential::new(token)),
            CredentialPayload::Token(_) => Err(CredentialError::MissingToken),
            CredentialPayload::Claims(claims) => {
                let token = claims
                    .token
                    .filter(|t| !t.trim().is_empty())
                    .ok_or(CredentialError::MissingToken)?;
                Ok(Credential {
                    token,
                    user_id: claims.user_id,
                    username: claims.username,
                })
            }
        }
    }
}
