use http::{HeaderMap, header::AsHeaderName};

/// Project identifier header attached to default requests.
pub(crate) const PROJECT_ID: &str = "x-goog-project-id";
/// Canned ACL header.
pub(crate) const ACL: &str = "x-goog-acl";
/// Copy source header, formatted `{bucket}/{object}`.
pub(crate) const COPY_SOURCE: &str = "x-goog-copy-source";

pub(crate) fn header_string<N>(headers: &HeaderMap, name: N) -> Option<String>
where
    N: AsHeaderName,
{
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn copy_source_header_value(bucket: &str, object: &str) -> String {
    format!("{bucket}/{object}")
}
