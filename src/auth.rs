use std::{fmt, path::PathBuf};

use serde::Deserialize;

use crate::{
    config::Scope,
    error::{Error, Result},
};

/// Environment variable holding a ready-made OAuth2 access token.
pub const ACCESS_TOKEN_ENV: &str = "GCS_ACCESS_TOKEN";

const STORED_CREDENTIALS_FILE: &str = "stored_credentials.json";

/// OAuth2 bearer credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into().trim().to_string();
        if access_token.is_empty() {
            return Err(Error::invalid_config("access token must not be empty"));
        }
        Ok(Self { access_token })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token with its middle masked, for display.
    pub fn redacted(&self) -> String {
        crate::util::redact::redact_value(&self.access_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.redacted())
            .finish()
    }
}

/// Source of credentials for a scope.
///
/// `force` asks the provider to skip any cached token and authorize again.
pub trait AuthProvider: Send + Sync {
    fn authorize(&self, scope: Scope, force: bool) -> Result<Credentials>;
}

/// Hands out one fixed token for every scope.
#[derive(Clone, Debug)]
pub struct StaticTokenProvider {
    credentials: Credentials,
}

impl StaticTokenProvider {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            credentials: Credentials::new(access_token)?,
        })
    }

    /// Reads `GCS_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(ACCESS_TOKEN_ENV)
            .map_err(|_| Error::invalid_config(format!("missing {ACCESS_TOKEN_ENV}")))?;
        Self::new(token)
    }
}

impl AuthProvider for StaticTokenProvider {
    fn authorize(&self, _scope: Scope, _force: bool) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// Reads a token from a JSON file written by an external OAuth2 tool.
///
/// The file is read on every `authorize` call so a refreshed token is picked
/// up when the scope changes.
#[derive(Clone, Debug)]
pub struct StoredTokenProvider {
    path: PathBuf,
}

#[derive(Deserialize)]
struct StoredToken {
    access_token: String,
}

impl StoredTokenProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.gcs-xml/stored_credentials.json`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(
            crate::config::app_dir()?.join(STORED_CREDENTIALS_FILE),
        ))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl AuthProvider for StoredTokenProvider {
    fn authorize(&self, _scope: Scope, _force: bool) -> Result<Credentials> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| Error::local_io(&self.path, e))?;
        let stored: StoredToken = serde_json::from_str(&contents).map_err(|e| {
            Error::decode(
                format!("invalid stored credentials in {}", self.path.display()),
                Some(Box::new(e)),
            )
        })?;
        Credentials::new(stored.access_token)
    }
}
