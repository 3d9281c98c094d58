//! Shared request/response types and operation inputs.

use std::{fmt, path::PathBuf};

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header::HeaderName};

use crate::error::{Error, Result};

/// Default CORS origin.
pub const DEFAULT_CORS_ORIGIN: &str = "*";
/// Default CORS method.
pub const DEFAULT_CORS_METHOD: &str = "GET";
/// Default CORS response header.
pub const DEFAULT_CORS_RESPONSE_HEADER: &str = "GCS-Demo";
/// Default CORS max age, in seconds.
pub const DEFAULT_CORS_MAX_AGE_SECS: i64 = 1800;

/// A single HTTP call against a virtual-hosted target.
#[derive(Clone, Debug)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Bucket-qualified virtual host, e.g. `photos.storage.googleapis.com`.
    pub host: String,
    /// Object path, always starting with `/`.
    pub path: String,
    /// Sub-resource marker such as `cors`, `acl`, or `location`.
    pub query: Option<String>,
    /// Request headers. Empty means "derive defaults" at dispatch time.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
}

impl Request {
    /// Starts a GET request against `host` with path `/`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            host: host.into(),
            path: "/".to_string(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Addresses an object key below the host.
    pub fn key(mut self, key: impl AsRef<str>) -> Self {
        self.path = format!("/{}", key.as_ref().trim_start_matches('/'));
        self
    }

    /// Selects a sub-resource such as `cors`.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Adds a header, rejecting names or values that are not valid HTTP.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::invalid_config(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::invalid_config(format!("invalid value for header {name}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A response whose status was below 300.
#[derive(Clone, Debug)]
pub struct Response {
    /// HTTP status.
    pub status: StatusCode,
    /// Canonical reason phrase for `status`. The HTTP client does not expose
    /// the phrase the server sent, so a custom one is never seen here.
    pub reason: String,
    /// Response headers, iterated in the order they were received.
    pub headers: HeaderMap,
    /// Response body; empty when the service sent none.
    pub body: Bytes,
}

impl Response {
    /// Creates a response with the canonical reason phrase for `status`.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Looks up a header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the body as UTF-8 text, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Object address parsed from `scheme://bucket/key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectPath {
    /// Bucket segment.
    pub bucket: String,
    /// Key segment; may itself contain `/`.
    pub key: String,
}

impl ObjectPath {
    /// Creates a path from its parts.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parses `gs://bucket/key`; the third and fourth `/`-delimited segments
    /// are the bucket and the key.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let mut parts = value.splitn(4, '/');

        let scheme = parts.next().unwrap_or_default();
        if !scheme.ends_with(':') || scheme.len() < 2 {
            return Err(Error::path_format(value, "expected scheme://bucket/key"));
        }
        if parts.next() != Some("") {
            return Err(Error::path_format(value, "expected // after the scheme"));
        }

        let bucket = match parts.next() {
            Some(b) if !b.is_empty() => b,
            _ => return Err(Error::path_format(value, "missing bucket segment")),
        };
        let key = match parts.next() {
            Some(k) if !k.is_empty() => k,
            _ => return Err(Error::path_format(value, "missing object segment")),
        };

        Ok(Self::new(bucket, key))
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gs://{}/{}", self.bucket, self.key)
    }
}

impl std::str::FromStr for ObjectPath {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

/// Predefined ACL sent in the `x-goog-acl` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CannedAcl {
    #[default]
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl CannedAcl {
    /// All values, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Private,
        Self::PublicRead,
        Self::PublicReadWrite,
        Self::AuthenticatedRead,
        Self::BucketOwnerRead,
        Self::BucketOwnerFullControl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::AuthenticatedRead => "authenticated-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl std::str::FromStr for CannedAcl {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|acl| acl.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::invalid_config(format!("unknown canned ACL: {value}")))
    }
}

/// Bucket location, mapping human labels to protocol codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocationConstraint {
    Europe,
    #[default]
    Usa,
}

impl LocationConstraint {
    pub const ALL: [Self; 2] = [Self::Europe, Self::Usa];

    /// Label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Self::Europe => "Europe",
            Self::Usa => "USA",
        }
    }

    /// Code sent on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Self::Europe => "EU",
            Self::Usa => "US",
        }
    }
}

impl std::str::FromStr for LocationConstraint {
    type Err = Error;

    /// Accepts either the label or the code, ignoring case.
    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(value) || l.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::invalid_config(format!("unknown bucket location: {value}")))
    }
}

/// Permission granted by an ACL entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AclPermission {
    #[default]
    Read,
    Write,
    FullControl,
}

impl AclPermission {
    pub const ALL: [Self; 3] = [Self::Read, Self::Write, Self::FullControl];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::FullControl => "FULL_CONTROL",
        }
    }
}

impl std::str::FromStr for AclPermission {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::invalid_config(format!("unknown ACL permission: {value}")))
    }
}

/// Kind of identity an ACL entry applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AclScopeType {
    #[default]
    UserByEmail,
    GroupByEmail,
}

impl AclScopeType {
    pub const ALL: [Self; 2] = [Self::UserByEmail, Self::GroupByEmail];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserByEmail => "UserByEmail",
            Self::GroupByEmail => "GroupByEmail",
        }
    }
}

impl std::str::FromStr for AclScopeType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::invalid_config(format!("unknown ACL scope: {value}")))
    }
}

/// ACL grant for a user or group email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AclEntry {
    pub permission: AclPermission,
    pub scope_type: AclScopeType,
    /// Email address of the user or group.
    pub identifier: String,
}

impl AclEntry {
    pub fn new(
        permission: AclPermission,
        scope_type: AclScopeType,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            permission,
            scope_type,
            identifier: identifier.into(),
        }
    }
}

/// CORS max age; the variant decides how the value is written.
#[derive(Clone, Debug, PartialEq)]
pub enum MaxAge {
    /// Written without a decimal point.
    Integer(i64),
    /// Written with six fractional digits.
    Float(f64),
    /// Written verbatim.
    Text(String),
}

impl MaxAge {
    /// Renders the value as element text.
    pub fn render(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => format!("{v:.6}"),
            Self::Text(v) => v.clone(),
        }
    }
}

impl Default for MaxAge {
    fn default() -> Self {
        Self::Integer(DEFAULT_CORS_MAX_AGE_SECS)
    }
}

impl From<i64> for MaxAge {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for MaxAge {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for MaxAge {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for MaxAge {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MaxAge {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One CORS block for a bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct CorsRule {
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub response_headers: Vec<String>,
    pub max_age: MaxAge,
}

impl Default for CorsRule {
    fn default() -> Self {
        Self {
            origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            methods: vec![DEFAULT_CORS_METHOD.to_string()],
            response_headers: vec![DEFAULT_CORS_RESPONSE_HEADER.to_string()],
            max_age: MaxAge::default(),
        }
    }
}

impl CorsRule {
    /// Builds a rule from comma-separated user input. Blank fields fall back
    /// to the defaults; a non-blank max age is kept verbatim.
    pub fn from_lists(origins: &str, methods: &str, response_headers: &str, max_age: &str) -> Self {
        let defaults = Self::default();
        Self {
            origins: split_list(origins).unwrap_or(defaults.origins),
            methods: split_list(methods).unwrap_or(defaults.methods),
            response_headers: split_list(response_headers).unwrap_or(defaults.response_headers),
            max_age: if max_age.trim().is_empty() {
                defaults.max_age
            } else {
                MaxAge::Text(max_age.to_string())
            },
        }
    }
}

fn split_list(value: &str) -> Option<Vec<String>> {
    if value.trim().is_empty() {
        return None;
    }
    Some(value.split(',').map(|v| v.trim().to_string()).collect())
}

/// Input for creating a bucket.
#[derive(Clone, Debug, Default)]
pub struct CreateBucketInput {
    pub name: String,
    /// Defaults to [`CannedAcl::Private`].
    pub acl: Option<CannedAcl>,
    /// Defaults to [`LocationConstraint::Usa`].
    pub location: Option<LocationConstraint>,
}

impl CreateBucketInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_acl(mut self, acl: CannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }

    pub fn with_location(mut self, location: LocationConstraint) -> Self {
        self.location = Some(location);
        self
    }
}

/// Input for uploading a local file.
#[derive(Clone, Debug)]
pub struct UploadObjectInput {
    pub file: PathBuf,
    pub destination: ObjectPath,
    /// Defaults to [`CannedAcl::Private`].
    pub acl: Option<CannedAcl>,
}

/// Input for downloading an object into a local file.
#[derive(Clone, Debug)]
pub struct DownloadObjectInput {
    pub source: ObjectPath,
    pub file: PathBuf,
}

/// Input for a server-side object copy.
#[derive(Clone, Debug)]
pub struct CopyObjectInput {
    pub source_bucket: String,
    pub source_object: String,
    pub target_bucket: String,
    /// Defaults to the source object name.
    pub target_object: Option<String>,
    /// Defaults to [`CannedAcl::Private`].
    pub acl: Option<CannedAcl>,
}

impl CopyObjectInput {
    pub fn new(
        source_bucket: impl Into<String>,
        source_object: impl Into<String>,
        target_bucket: impl Into<String>,
    ) -> Self {
        Self {
            source_bucket: source_bucket.into(),
            source_object: source_object.into(),
            target_bucket: target_bucket.into(),
            target_object: None,
            acl: None,
        }
    }

    pub fn with_target_object(mut self, name: impl Into<String>) -> Self {
        self.target_object = Some(name.into());
        self
    }

    pub fn with_acl(mut self, acl: CannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }

    /// Target object name after applying the default.
    pub fn resolved_target_object(&self) -> &str {
        match self.target_object.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.source_object,
        }
    }
}

/// Result of a delete that requires confirmation.
#[derive(Clone, Debug)]
pub enum DeleteOutcome {
    /// The DELETE was sent and succeeded.
    Deleted(Response),
    /// The caller did not confirm; nothing was sent.
    Aborted,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }
}

/// Returns true only for the affirmative confirmation value `yes`.
pub fn is_confirmed(value: &str) -> bool {
    value.trim() == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_path() {
        let path = ObjectPath::parse("gs://photos/2024/cat.png").unwrap();
        assert_eq!(path.bucket, "photos");
        assert_eq!(path.key, "2024/cat.png");
        assert_eq!(path.to_string(), "gs://photos/2024/cat.png");
    }

    #[test]
    fn rejects_object_path_without_segments() {
        for bad in ["", "photos/cat.png", "gs://photos", "gs://photos/", "gs:///cat"] {
            match ObjectPath::parse(bad) {
                Err(Error::PathFormat { .. }) => {}
                other => panic!("expected path format error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn location_accepts_label_or_code() {
        assert_eq!(
            "Europe".parse::<LocationConstraint>().unwrap(),
            LocationConstraint::Europe
        );
        assert_eq!(
            "us".parse::<LocationConstraint>().unwrap(),
            LocationConstraint::Usa
        );
        assert!("Mars".parse::<LocationConstraint>().is_err());
        assert_eq!(LocationConstraint::default().code(), "US");
    }

    #[test]
    fn max_age_rendering_depends_on_variant() {
        assert_eq!(MaxAge::from(1800_i64).render(), "1800");
        assert_eq!(MaxAge::from(1800.5).render(), "1800.500000");
        assert_eq!(MaxAge::from("3600").render(), "3600");
    }

    #[test]
    fn cors_rule_from_lists_applies_defaults() {
        let rule = CorsRule::from_lists("", " GET , PUT", "", " ");
        assert_eq!(rule.origins, vec!["*"]);
        assert_eq!(rule.methods, vec!["GET", "PUT"]);
        assert_eq!(rule.response_headers, vec!["GCS-Demo"]);
        assert_eq!(rule.max_age, MaxAge::Integer(1800));

        let rule = CorsRule::from_lists("http://a.example, http://b.example", "", "X-A", "60");
        assert_eq!(rule.origins, vec!["http://a.example", "http://b.example"]);
        assert_eq!(rule.max_age, MaxAge::Text("60".to_string()));
    }

    #[test]
    fn request_builder_composes_target() {
        let req = Request::new("photos.storage.googleapis.com")
            .key("/a/b.txt")
            .query("acl");
        assert_eq!(req.host, "photos.storage.googleapis.com");
        assert_eq!(req.path, "/a/b.txt");
        assert_eq!(req.query.as_deref(), Some("acl"));
        assert!(req.header("bad name", "v").is_err());
    }

    #[test]
    fn copy_target_defaults_to_source_name() {
        let input = CopyObjectInput::new("src", "a.txt", "dst");
        assert_eq!(input.resolved_target_object(), "a.txt");
        let input = input.with_target_object("b.txt");
        assert_eq!(input.resolved_target_object(), "b.txt");
    }

    #[test]
    fn confirmation_requires_yes() {
        assert!(is_confirmed("yes"));
        assert!(is_confirmed(" yes\n"));
        assert!(!is_confirmed("YES"));
        assert!(!is_confirmed("no"));
        assert!(!is_confirmed(""));
    }
}
