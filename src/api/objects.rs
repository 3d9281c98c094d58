//! Object operations.

use http::{Method, header::CONTENT_LENGTH};

use super::{ObjectOperations, read_local_file, write_local_file};
use crate::{
    dispatch::dispatch,
    error::Result,
    session::Session,
    types::{
        AclEntry, CopyObjectInput, DeleteOutcome, DownloadObjectInput, ObjectPath, Request,
        Response, UploadObjectInput, is_confirmed,
    },
    util,
};

/// Object operations against the XML API.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectsService;

impl ObjectsService {
    pub fn new() -> Self {
        Self
    }
}

fn object_request(session: &Session, path: &ObjectPath) -> Request {
    Request::new(session.bucket_host(&path.bucket)).key(&path.key)
}

impl ObjectOperations for ObjectsService {
    fn upload_object(&self, session: &Session, input: &UploadObjectInput) -> Result<Response> {
        let dest = &input.destination;
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("upload_object", &dest.bucket, &dest.key).entered();

        let contents = read_local_file(&input.file)?;
        let hints = util::mime::guess(&input.file);
        let acl = input.acl.unwrap_or_default();

        let mut request = object_request(session, dest)
            .method(Method::PUT)
            .header(http::header::CONTENT_TYPE.as_str(), &hints.content_type)?;
        if let Some(encoding) = hints.content_encoding {
            request = request.header(http::header::CONTENT_ENCODING.as_str(), encoding)?;
        }
        let request = request
            .header(util::headers::ACL, acl.as_str())?
            .body(contents);

        dispatch(session, request)
    }

    fn download_object(
        &self,
        session: &Session,
        input: &DownloadObjectInput,
    ) -> Result<Response> {
        let source = &input.source;
        #[cfg(feature = "tracing")]
        let _guard =
            super::request_span("download_object", &source.bucket, &source.key).entered();

        let resp = dispatch(session, object_request(session, source))?;
        write_local_file(&input.file, &resp.body)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(bytes = resp.body.len(), file = %input.file.display(), "object saved");

        Ok(resp)
    }

    fn copy_object(&self, session: &Session, input: &CopyObjectInput) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span(
            "copy_object",
            &input.source_bucket,
            &input.source_object,
        )
        .entered();

        let source = ObjectPath::new(&input.source_bucket, &input.source_object);
        let head = dispatch(session, object_request(session, &source).method(Method::HEAD))?;

        let content_length = util::headers::header_string(&head.headers, CONTENT_LENGTH)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let target = ObjectPath::new(&input.target_bucket, input.resolved_target_object());
        let copy_source =
            util::headers::copy_source_header_value(&input.source_bucket, &input.source_object);
        let request = object_request(session, &target)
            .method(Method::PUT)
            .header(util::headers::COPY_SOURCE, &copy_source)?
            .header(util::headers::ACL, input.acl.unwrap_or_default().as_str())?
            .header(CONTENT_LENGTH.as_str(), &content_length.to_string())?;

        dispatch(session, request)
    }

    fn get_object_acl(&self, session: &Session, path: &ObjectPath) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("get_object_acl", &path.bucket, &path.key).entered();

        dispatch(session, object_request(session, path).query("acl"))
    }

    fn set_object_acl(
        &self,
        session: &Session,
        path: &ObjectPath,
        entry: &AclEntry,
    ) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("set_object_acl", &path.bucket, &path.key).entered();

        let body = util::xml::encode_acl_email(entry)?;
        let request = object_request(session, path)
            .method(Method::PUT)
            .query("acl")
            .body(body);
        dispatch(session, request)
    }

    fn get_object_metadata(&self, session: &Session, path: &ObjectPath) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard =
            super::request_span("get_object_metadata", &path.bucket, &path.key).entered();

        dispatch(session, object_request(session, path).method(Method::HEAD))
    }

    fn delete_object(
        &self,
        session: &Session,
        path: &ObjectPath,
        confirmation: &str,
    ) -> Result<DeleteOutcome> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("delete_object", &path.bucket, &path.key).entered();

        if !is_confirmed(confirmation) {
            return Ok(DeleteOutcome::Aborted);
        }

        let request = object_request(session, path).method(Method::DELETE);
        dispatch(session, request).map(DeleteOutcome::Deleted)
    }
}
