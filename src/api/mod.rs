//! Storage operations, one method per XML API verb.
//!
//! Every method composes a [`Request`](crate::types::Request) against the
//! bucket's virtual host and hands it to [`dispatch`](crate::dispatch::dispatch).

mod buckets;
mod objects;

pub use buckets::BucketsService;
pub use objects::ObjectsService;

use std::path::Path;

use crate::{
    error::Result,
    session::Session,
    types::{
        AclEntry, CorsRule, CopyObjectInput, CreateBucketInput, DeleteOutcome,
        DownloadObjectInput, ObjectPath, Response, UploadObjectInput,
    },
};

/// Project- and bucket-level operations.
pub trait BucketOperations: Send + Sync {
    /// GET on the service endpoint.
    fn list_buckets(&self, session: &Session) -> Result<Response>;

    /// GET on the bucket root.
    fn list_objects(&self, session: &Session, bucket: &str) -> Result<Response>;

    /// PUT with a canned ACL header and a location body. The name is
    /// validated before anything is sent.
    fn create_bucket(&self, session: &Session, input: &CreateBucketInput) -> Result<Response>;

    /// DELETE, sent only when `confirmation` is `yes`.
    fn delete_bucket(
        &self,
        session: &Session,
        bucket: &str,
        confirmation: &str,
    ) -> Result<DeleteOutcome>;

    fn get_bucket_cors(&self, session: &Session, bucket: &str) -> Result<Response>;

    fn set_bucket_cors(&self, session: &Session, bucket: &str, rule: &CorsRule)
    -> Result<Response>;

    fn get_bucket_location(&self, session: &Session, bucket: &str) -> Result<Response>;
}

/// Object-level operations.
pub trait ObjectOperations: Send + Sync {
    /// PUT with the file bytes; content type and encoding come from the path.
    fn upload_object(&self, session: &Session, input: &UploadObjectInput) -> Result<Response>;

    /// GET, writing the body to the local file.
    fn download_object(&self, session: &Session, input: &DownloadObjectInput)
    -> Result<Response>;

    /// HEAD on the source, then PUT on the target with `x-goog-copy-source`.
    fn copy_object(&self, session: &Session, input: &CopyObjectInput) -> Result<Response>;

    fn get_object_acl(&self, session: &Session, path: &ObjectPath) -> Result<Response>;

    fn set_object_acl(
        &self,
        session: &Session,
        path: &ObjectPath,
        entry: &AclEntry,
    ) -> Result<Response>;

    /// HEAD on the object.
    fn get_object_metadata(&self, session: &Session, path: &ObjectPath) -> Result<Response>;

    /// DELETE, sent only when `confirmation` is `yes`.
    fn delete_object(
        &self,
        session: &Session,
        path: &ObjectPath,
        confirmation: &str,
    ) -> Result<DeleteOutcome>;
}

#[cfg(feature = "tracing")]
pub(crate) fn request_span(op: &'static str, bucket: &str, key: &str) -> tracing::Span {
    tracing::info_span!("gcs.request", op, bucket, key)
}

pub(crate) fn read_local_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| crate::Error::local_io(path, e))
}

pub(crate) fn write_local_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| crate::Error::local_io(path, e))
}
