//! A small client for the Google Cloud Storage XML API.
//!
//! Requests are addressed virtual-host style (`http://{bucket}.{endpoint}/{key}`),
//! sent through an injected [`Transport`], and classified into a [`Response`]
//! or an [`Error`].
//!
//! ## Quick start
//!
//! ```no_run
//! # fn demo() -> Result<(), gcs_xml::Error> {
//! use std::sync::Arc;
//!
//! use gcs_xml::{
//!     Commands, CreateBucketInput, HttpTransport, ProjectId, SessionConfig,
//!     StaticTokenProvider, format,
//! };
//!
//! let config = SessionConfig::new(ProjectId::new("my-project")?);
//! let transport = Arc::new(HttpTransport::new(None, None)?);
//! let auth = Arc::new(StaticTokenProvider::from_env()?);
//! let commands = Commands::connect(config, transport, auth)?;
//!
//! let resp = commands.create_bucket(&CreateBucketInput::new("my-bucket-1"))?;
//! print!("{}", format::render_response(&resp, true));
//! # Ok(())
//! # }
//! ```

/// Bucket and object operations.
pub mod api;
/// Credentials and authorization providers.
pub mod auth;
/// Command facade used by front ends.
pub mod commands;
/// Endpoint, project, and scope configuration.
pub mod config;
/// Request dispatch and status classification.
pub mod dispatch;
/// Console rendering of responses.
pub mod format;
/// Bucket naming rules.
pub mod naming;
/// Per-process session context.
pub mod session;
/// HTTP transports.
pub mod transport;
/// Shared request/response types and operation inputs.
pub mod types;

mod error;
mod util;

pub use api::{BucketOperations, BucketsService, ObjectOperations, ObjectsService};
pub use auth::{AuthProvider, Credentials, StaticTokenProvider, StoredTokenProvider};
pub use commands::Commands;
pub use config::{ProjectId, ProjectStore, Scope, SessionConfig};
pub use dispatch::dispatch;
pub use error::{Error, Result, StorageStatus};
pub use naming::{NamingRule, validate_bucket_name};
pub use session::Session;
pub use transport::{AuthorizedTransport, HttpTransport, Transport, TransportError};
pub use types::{
    AclEntry, AclPermission, AclScopeType, CannedAcl, CopyObjectInput, CorsRule,
    CreateBucketInput, DeleteOutcome, DownloadObjectInput, LocationConstraint, MaxAge,
    ObjectPath, Request, Response, UploadObjectInput,
};

/// XML request bodies, exposed for benchmarks and inspection.
pub mod xml {
    pub use crate::util::xml::{encode_acl_email, encode_cors, encode_location, pretty_print};
}
