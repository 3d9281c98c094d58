use std::{error::Error as StdError, fmt, path::PathBuf};

use http::StatusCode;

use crate::naming::NamingRule;

/// Library result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Status carried by a storage error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageStatus {
    /// The service answered with a status of 300 or above.
    Http(StatusCode),
    /// The endpoint host could not be resolved or reached.
    ServerNotFound,
}

impl fmt::Display for StorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(status) => write!(f, "{}", status.as_u16()),
            Self::ServerNotFound => f.write_str("not found"),
        }
    }
}

/// Error type for validation, local IO, transport, and service responses.
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration or parameters.
    InvalidConfig { message: String },

    /// Bucket name violates the naming grammar.
    Naming { name: String, rule: NamingRule },

    /// Object path is missing its bucket or key segment.
    PathFormat { path: String, message: String },

    /// A required field of an XML request body was missing.
    Structure { field: &'static str },

    /// Service returned a status of 300 or above, or the host was unreachable.
    Storage {
        status: StorageStatus,
        message: String,
    },

    /// Local file could not be read or written.
    LocalIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Transport-level failure (HTTP client, IO, TLS).
    Transport {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },

    /// A request body could not be serialized.
    Encode {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },

    /// A response or local document could not be parsed or reformatted.
    Decode {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { message } => f
                .debug_struct("InvalidConfig")
                .field("message", message)
                .finish(),
            Self::Naming { name, rule } => f
                .debug_struct("Naming")
                .field("name", name)
                .field("rule", rule)
                .finish(),
            Self::PathFormat { path, message } => f
                .debug_struct("PathFormat")
                .field("path", path)
                .field("message", message)
                .finish(),
            Self::Structure { field } => f.debug_struct("Structure").field("field", field).finish(),
            Self::Storage { status, message } => f
                .debug_struct("Storage")
                .field("status", status)
                .field("message", message)
                .finish(),
            Self::LocalIo { path, source } => f
                .debug_struct("LocalIo")
                .field("path", path)
                .field("source", source)
                .finish(),
            Self::Transport { message, source } => f
                .debug_struct("Transport")
                .field("message", message)
                .field("source", source)
                .finish(),
            Self::Encode { message, source } => f
                .debug_struct("Encode")
                .field("message", message)
                .field("source", source)
                .finish(),
            Self::Decode { message, source } => f
                .debug_struct("Decode")
                .field("message", message)
                .field("source", source)
                .finish(),
        }
    }
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a path format error for the given object path.
    pub fn path_format(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PathFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a structure error naming the missing field.
    pub fn structure(field: &'static str) -> Self {
        Self::Structure { field }
    }

    /// Creates a storage error from an HTTP status and reason phrase.
    pub fn storage(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Storage {
            status: StorageStatus::Http(status),
            message: message.into(),
        }
    }

    /// Creates the storage error reported when the host cannot be reached.
    pub fn server_not_found() -> Self {
        Self::Storage {
            status: StorageStatus::ServerNotFound,
            message: "Server not found.".to_string(),
        }
    }

    /// Creates a local IO error for the given path.
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Creates a transport error with optional source.
    pub fn transport(
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source,
        }
    }

    /// Creates an encode error with optional source.
    pub fn encode(
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self::Encode {
            message: message.into(),
            source,
        }
    }

    /// Creates a decode error with optional source.
    pub fn decode(
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self::Decode {
            message: message.into(),
            source,
        }
    }

    /// Returns the storage status when the error came from the service.
    pub fn status(&self) -> Option<StorageStatus> {
        match self {
            Self::Storage { status, .. } => Some(*status),
            Self::InvalidConfig { .. }
            | Self::Naming { .. }
            | Self::PathFormat { .. }
            | Self::Structure { .. }
            | Self::LocalIo { .. }
            | Self::Transport { .. }
            | Self::Encode { .. }
            | Self::Decode { .. } => None,
        }
    }

    /// Returns true for errors raised before any request was built.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Naming { .. } | Self::PathFormat { .. } | Self::Structure { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { message } => write!(f, "invalid config: {message}"),
            Self::Naming { rule, .. } => f.write_str(rule.message()),
            Self::PathFormat { path, message } => {
                write!(f, "invalid object path {path:?}: {message}")
            }
            Self::Structure { field } => write!(f, "missing required field: {field}"),
            Self::Storage { status, message } => write!(f, "{status}: {message}"),
            Self::LocalIo { path, source } => {
                write!(f, "local file error ({}): {source}", path.display())
            }
            Self::Transport { message, .. } => write!(f, "transport error: {message}"),
            Self::Encode { message, .. } => write!(f, "encode error: {message}"),
            Self::Decode { message, .. } => write!(f, "decode error: {message}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport { source, .. }
            | Self::Encode { source, .. }
            | Self::Decode { source, .. } => {
                source.as_deref().map(|e| e as &(dyn StdError + 'static))
            }
            Self::LocalIo { source, .. } => Some(source),
            Self::InvalidConfig { .. }
            | Self::Naming { .. }
            | Self::PathFormat { .. }
            | Self::Structure { .. }
            | Self::Storage { .. } => None,
        }
    }
}
