//! HTTP transport seam.
//!
//! The dispatcher only depends on [`Transport`]; the crate ships a ureq based
//! [`HttpTransport`] and an [`AuthorizedTransport`] that adds a bearer token.

use std::{error::Error as StdError, fmt, sync::Arc};

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use url::Url;

use crate::{auth::Credentials, types::Response};

mod blocking_transport;

pub use blocking_transport::HttpTransport;

/// Failure to obtain any HTTP response.
pub enum TransportError {
    /// The host could not be resolved or reached.
    HostNotFound,
    /// Any other failure (IO, TLS, protocol, timeout).
    Failed {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },
}

impl TransportError {
    pub fn failed(
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source,
        }
    }
}

impl fmt::Debug for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostNotFound => f.write_str("HostNotFound"),
            Self::Failed { message, source } => f
                .debug_struct("Failed")
                .field("message", message)
                .field("source", source)
                .finish(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostNotFound => f.write_str("host not found"),
            Self::Failed { message, .. } => f.write_str(message),
        }
    }
}

/// Sends one HTTP request and returns the raw response, whatever its status.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Bytes>,
    ) -> Result<Response, TransportError>;
}

/// Adds `Authorization: Bearer <token>` before delegating to `inner`.
pub struct AuthorizedTransport {
    inner: Arc<dyn Transport>,
    authorization: HeaderValue,
}

impl AuthorizedTransport {
    pub fn new(inner: Arc<dyn Transport>, credentials: &Credentials) -> crate::Result<Self> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", credentials.access_token()))
                .map_err(|_| crate::Error::invalid_config("access token is not a valid header"))?;
        authorization.set_sensitive(true);

        Ok(Self {
            inner,
            authorization,
        })
    }
}

impl fmt::Debug for AuthorizedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedTransport")
            .field("authorization", &"<redacted>")
            .finish()
    }
}

impl Transport for AuthorizedTransport {
    fn send(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Bytes>,
    ) -> Result<Response, TransportError> {
        let mut headers = headers.clone();
        headers.insert(http::header::AUTHORIZATION, self.authorization.clone());
        self.inner.send(method, url, &headers, body)
    }
}
