//! HTTP transport to the POS backend.
//!
//! Every request goes through [`ApiClient`], which resolves paths against the
//! configured base URL and attaches the session's bearer token when the call
//! is made with [`Access::Bearer`].

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use posadmin_auth::SessionManager;

/// Whether a request carries the session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Attach `Authorization: Bearer <token>`.
    Bearer,
    /// Send without credentials (login, signup, order endpoints).
    Anonymous,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// Client for the backend REST API.
///
/// Cheap to clone: the underlying connection pool and the session handle are
/// shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionManager) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self::with_client(http, base_url, session))
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: SessionManager,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, access: Access) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, self.url(path));

        if access == Access::Bearer {
            if let Some(credential) = self.session.credential() {
                req = req.bearer_auth(credential.token());
            }
        }

        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(ApiError::Api(status, resp.text().await.unwrap_or_default()));
        }

        Ok(resp)
    }

    /// `GET` a JSON document.
    pub async fn get_json<T>(&self, path: &str, access: Access) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(path, ?access, "GET");
        let resp = self.send(self.request(Method::GET, path, access)).await?;
        resp.json::<T>().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Send a JSON body and return the raw response body.
    ///
    /// Mutation endpoints echo the stored entity, but callers re-list instead
    /// of trusting the echo, so the body is handed back unparsed.
    pub async fn send_json<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        access: Access,
    ) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!(%method, path, ?access, "sending");
        let resp = self.send(self.request(method, path, access).json(body)).await?;
        resp.text().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn post_json<B>(&self, path: &str, body: &B, access: Access) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body, access).await
    }

    pub async fn put_json<B>(&self, path: &str, body: &B, access: Access) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body, access).await
    }

    pub async fn delete(&self, path: &str, access: Access) -> Result<(), ApiError> {
        tracing::debug!(path, ?access, "DELETE");
        self.send(self.request(Method::DELETE, path, access)).await?;
        Ok(())
    }
}
