//! Session configuration: endpoint, project id, and access scope.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::{Error, Result};

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "storage.googleapis.com";

const APP_DIR: &str = ".gcs-xml";
const PROJECT_FILE_NAME: &str = "project.dat";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "GCS_XML_ENDPOINT";
/// Environment variable overriding the project file location.
pub const PROJECT_FILE_ENV: &str = "GCS_XML_PROJECT_FILE";
/// Environment variable overriding the stored project id.
pub const PROJECT_ID_ENV: &str = "GCS_PROJECT_ID";

/// OAuth2 access scope requested for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    ReadOnly,
    WriteOnly,
    ReadWrite,
    FullControl,
}

impl Scope {
    pub const ALL: [Self; 4] = [
        Self::ReadOnly,
        Self::WriteOnly,
        Self::ReadWrite,
        Self::FullControl,
    ];

    pub fn url(self) -> &'static str {
        match self {
            Self::ReadOnly => "https://www.googleapis.com/auth/devstorage.read_only",
            Self::WriteOnly => "https://www.googleapis.com/auth/devstorage.write_only",
            Self::ReadWrite => "https://www.googleapis.com/auth/devstorage.read_write",
            Self::FullControl => "https://www.googleapis.com/auth/devstorage.full_control",
        }
    }

    /// Menu key, e.g. `RO_SCOPE`.
    pub fn key(self) -> &'static str {
        match self {
            Self::ReadOnly => "RO_SCOPE",
            Self::WriteOnly => "WO_SCOPE",
            Self::ReadWrite => "RW_SCOPE",
            Self::FullControl => "FC_SCOPE",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::WriteOnly => "write_only",
            Self::ReadWrite => "read_write",
            Self::FullControl => "full_control",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

impl FromStr for Scope {
    type Err = Error;

    /// Accepts the menu key, the short name, or the full URL. Blank input
    /// selects the default.
    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::default());
        }
        Self::ALL
            .into_iter()
            .find(|s| {
                s.key().eq_ignore_ascii_case(value)
                    || s.short_name().eq_ignore_ascii_case(value)
                    || s.url() == value
            })
            .ok_or_else(|| Error::invalid_config(format!("unknown scope: {value}")))
    }
}

/// Project id sent in `x-goog-project-id`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(Error::invalid_config("project id must not be empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProjectId").field(&self.0).finish()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ProjectId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

/// Everything a session needs besides credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub endpoint: String,
    pub project_id: ProjectId,
    pub scope: Scope,
}

impl SessionConfig {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id,
            scope: Scope::default(),
        }
    }

    /// Overrides the endpoint host (for example a local emulator).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(Error::invalid_config("endpoint must not be empty"));
        }
        if endpoint.contains("://") {
            return Err(Error::invalid_config(
                "endpoint must be a host name without a scheme",
            ));
        }
        self.endpoint = endpoint;
        Ok(self)
    }
}

/// Plain-text file holding the project id between runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `GCS_XML_PROJECT_FILE`, falling back to `$HOME/.gcs-xml/project.dat`.
    pub fn from_env() -> Result<Self> {
        if let Some(path) = std::env::var_os(PROJECT_FILE_ENV) {
            return Ok(Self::new(path));
        }
        Ok(Self::new(app_dir()?.join(PROJECT_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored id; `None` when the file is missing or blank.
    pub fn load(&self) -> Result<Option<ProjectId>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => ProjectId::new(contents).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::local_io(&self.path, e)),
        }
    }

    /// `GCS_PROJECT_ID` when set, otherwise the stored value.
    pub fn resolve(&self) -> Result<Option<ProjectId>> {
        match std::env::var(PROJECT_ID_ENV) {
            Ok(id) if !id.trim().is_empty() => ProjectId::new(id).map(Some),
            _ => self.load(),
        }
    }

    pub fn save(&self, project_id: &ProjectId) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::local_io(parent, e))?;
        }
        std::fs::write(&self.path, project_id.as_str())
            .map_err(|e| Error::local_io(&self.path, e))
    }
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

pub(crate) fn app_dir() -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| Error::invalid_config("cannot determine home dir"))?;
    Ok(home.join(APP_DIR))
}
