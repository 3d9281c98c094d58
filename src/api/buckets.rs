//! Bucket operations.

use http::Method;

use super::BucketOperations;
use crate::{
    dispatch::dispatch,
    error::Result,
    naming::validate_bucket_name,
    session::Session,
    types::{CorsRule, CreateBucketInput, DeleteOutcome, Request, Response, is_confirmed},
    util,
};

/// Bucket operations against the XML API.
#[derive(Clone, Copy, Debug, Default)]
pub struct BucketsService;

impl BucketsService {
    pub fn new() -> Self {
        Self
    }
}

impl BucketOperations for BucketsService {
    fn list_buckets(&self, session: &Session) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("list_buckets", "", "").entered();

        dispatch(session, Request::new(session.endpoint()))
    }

    fn list_objects(&self, session: &Session, bucket: &str) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("list_objects", bucket, "").entered();

        dispatch(session, Request::new(session.bucket_host(bucket)))
    }

    fn create_bucket(&self, session: &Session, input: &CreateBucketInput) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("create_bucket", &input.name, "").entered();

        validate_bucket_name(&input.name)?;
        let acl = input.acl.unwrap_or_default();
        let body = util::xml::encode_location(input.location.unwrap_or_default())?;

        let request = Request::new(session.bucket_host(&input.name))
            .method(Method::PUT)
            .header(util::headers::PROJECT_ID, session.project_id().as_str())?
            .header(util::headers::ACL, acl.as_str())?
            .body(body);
        dispatch(session, request)
    }

    fn delete_bucket(
        &self,
        session: &Session,
        bucket: &str,
        confirmation: &str,
    ) -> Result<DeleteOutcome> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("delete_bucket", bucket, "").entered();

        validate_bucket_name(bucket)?;
        if !is_confirmed(confirmation) {
            #[cfg(feature = "tracing")]
            tracing::debug!("delete not confirmed");
            return Ok(DeleteOutcome::Aborted);
        }

        let request = Request::new(session.bucket_host(bucket)).method(Method::DELETE);
        dispatch(session, request).map(DeleteOutcome::Deleted)
    }

    fn get_bucket_cors(&self, session: &Session, bucket: &str) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("get_bucket_cors", bucket, "").entered();

        dispatch(session, Request::new(session.bucket_host(bucket)).query("cors"))
    }

    fn set_bucket_cors(
        &self,
        session: &Session,
        bucket: &str,
        rule: &CorsRule,
    ) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("set_bucket_cors", bucket, "").entered();

        let body = util::xml::encode_cors(rule)?;
        let request = Request::new(session.bucket_host(bucket))
            .method(Method::PUT)
            .query("cors")
            .body(body);
        dispatch(session, request)
    }

    fn get_bucket_location(&self, session: &Session, bucket: &str) -> Result<Response> {
        #[cfg(feature = "tracing")]
        let _guard = super::request_span("get_bucket_location", bucket, "").entered();

        dispatch(
            session,
            Request::new(session.bucket_host(bucket)).query("location"),
        )
    }
}
