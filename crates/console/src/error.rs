//! Console-level errors.
//!
//! Every failure is caught at the operation boundary: controllers record a
//! user-facing message in their state and also return one of these so callers
//! can branch on the kind.

use thiserror::Error;

use posadmin_auth::CredentialError;
use posadmin_core::DomainError;

use crate::transport::ApiError;

pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Rejected locally before dispatch.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The resource requires a session and there is none.
    #[error("not authenticated")]
    NotAuthenticated,

    /// A mutation is already outstanding on this controller.
    #[error("a request is already in flight")]
    SubmitInFlight,

    /// The user declined the confirmation prompt.
    #[error("cancelled by user")]
    Cancelled,

    /// The backend rejected the request or could not be reached.
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The backend answered but the response held no usable credential.
    #[error("{message}")]
    Credential {
        message: String,
        #[source]
        source: CredentialError,
    },
}

impl ConsoleError {
    pub fn request(message: impl Into<String>, source: ApiError) -> Self {
        Self::Request {
            message: message.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Domain(e) if e.is_validation())
    }
}
