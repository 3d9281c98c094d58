mod common;

use http::{Method, StatusCode};

use gcs_xml::{
    BucketOperations, BucketsService, CannedAcl, CorsRule, CreateBucketInput, Error,
    LocationConstraint, MaxAge, StorageStatus, TransportError,
};

use common::MockTransport;

#[test]
fn create_bucket_with_defaults_sends_acl_and_location() {
    let transport = MockTransport::new();
    let commands = common::commands(transport.clone());

    commands
        .create_bucket(&CreateBucketInput::new("my-bucket-1"))
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, Method::PUT);
    assert_eq!(req.url.as_str(), "http://my-bucket-1.storage.googleapis.com/");
    assert_eq!(req.header("x-goog-acl"), Some("private"));
    assert_eq!(req.header("x-goog-project-id"), Some(common::PROJECT_ID));
    assert_eq!(
        req.body_text(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><CreateBucketConfiguration><LocationConstraint>US</LocationConstraint></CreateBucketConfiguration>"
    );
    assert_eq!(
        req.header("content-length"),
        Some(req.body_text().len().to_string().as_str())
    );
    assert_eq!(
        req.header("authorization"),
        Some(format!("Bearer {}", common::TOKEN).as_str())
    );
}

#[test]
fn create_bucket_uses_given_acl_and_location_code() {
    let transport = MockTransport::new();
    let session = common::session(transport.clone());

    let input = CreateBucketInput::new("eu-photos")
        .with_acl(CannedAcl::PublicRead)
        .with_location(LocationConstraint::Europe);
    BucketsService::new().create_bucket(&session, &input).unwrap();

    let req = &transport.requests()[0];
    assert_eq!(req.header("x-goog-acl"), Some("public-read"));
    assert!(req.body_text().contains("<LocationConstraint>EU</LocationConstraint>"));
}

#[test]
fn invalid_bucket_name_sends_nothing() {
    let transport = MockTransport::new();
    let session = common::session(transport.clone());

    for name in ["ab", "-photos", "photos-", "bad name"] {
        let err = BucketsService::new()
            .create_bucket(&session, &CreateBucketInput::new(name))
            .unwrap_err();
        assert!(matches!(err, Error::Naming { .. }), "{name}: {err:?}");
        assert!(err.is_validation());
    }

    let err = BucketsService::new()
        .delete_bucket(&session, "x", "yes")
        .unwrap_err();
    assert!(matches!(err, Error::Naming { .. }));
    assert!(transport.requests().is_empty());
}

#[test]
fn delete_bucket_requires_yes() {
    let transport = MockTransport::new();
    let commands = common::commands(transport.clone());

    for answer in ["no", "", "YES", "y"] {
        let outcome = commands.delete_bucket("my-bucket-1", answer).unwrap();
        assert!(!outcome.is_deleted());
    }
    assert!(transport.requests().is_empty());

    transport.reply_status(StatusCode::NO_CONTENT);
    let outcome = commands.delete_bucket("my-bucket-1", "yes").unwrap();
    assert!(outcome.is_deleted());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(
        requests[0].url.host_str(),
        Some("my-bucket-1.storage.googleapis.com")
    );
}

#[test]
fn list_buckets_targets_service_endpoint_with_defaults() {
    let transport = MockTransport::new();
    let commands = common::commands(transport.clone());

    commands.list_buckets().unwrap();
    commands.list_objects("photos").unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].url.as_str(), "http://storage.googleapis.com/");
    assert_eq!(requests[0].header("x-goog-project-id"), Some(common::PROJECT_ID));
    assert_eq!(requests[0].header("content-length"), Some("0"));
    assert_eq!(requests[1].url.as_str(), "http://photos.storage.googleapis.com/");
}

#[test]
fn cors_and_location_use_query_markers() {
    let transport = MockTransport::new();
    let commands = common::commands(transport.clone());

    commands.get_bucket_cors("photos").unwrap();
    commands.get_bucket_location("photos").unwrap();

    let rule = CorsRule::from_lists(
        "http://a.example, http://b.example",
        "GET, PUT",
        "",
        "",
    );
    commands.set_bucket_cors("photos", &rule).unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url.query(), Some("cors"));
    assert_eq!(requests[1].url.query(), Some("location"));

    let put = &requests[2];
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.url.as_str(), "http://photos.storage.googleapis.com/?cors");
    let body = put.body_text();
    assert!(body.contains("<Origin>http://a.example</Origin><Origin>http://b.example</Origin>"));
    assert!(body.contains("<Method>GET</Method><Method>PUT</Method>"));
    assert!(body.contains("<ResponseHeader>GCS-Demo</ResponseHeader>"));
    assert!(body.contains("<MaxAgeSec>1800</MaxAgeSec>"));
    assert_eq!(
        put.header("content-length"),
        Some(body.len().to_string().as_str())
    );
}

#[test]
fn cors_max_age_keeps_value_type() {
    let transport = MockTransport::new();
    let commands = common::commands(transport.clone());

    let mut rule = CorsRule::default();
    rule.max_age = MaxAge::Float(1800.5);
    commands.set_bucket_cors("photos", &rule).unwrap();
    rule.max_age = MaxAge::from("3600");
    commands.set_bucket_cors("photos", &rule).unwrap();

    let requests = transport.requests();
    assert!(requests[0].body_text().contains("<MaxAgeSec>1800.500000</MaxAgeSec>"));
    assert!(requests[1].body_text().contains("<MaxAgeSec>3600</MaxAgeSec>"));
}

#[test]
fn error_statuses_surface_as_storage_errors() {
    let transport = MockTransport::new();
    let commands = common::commands(transport.clone());

    transport.reply_status(StatusCode::NOT_FOUND);
    let err = commands.get_bucket_location("missing").unwrap_err();
    assert_eq!(err.status(), Some(StorageStatus::Http(StatusCode::NOT_FOUND)));

    transport.reply_status(StatusCode::FORBIDDEN);
    let err = commands.list_buckets().unwrap_err();
    assert_eq!(err.to_string(), "403: Forbidden");

    transport.fail(TransportError::HostNotFound);
    let err = commands.list_buckets().unwrap_err();
    assert_eq!(err.status(), Some(StorageStatus::ServerNotFound));

    transport.reply_status(StatusCode::NO_CONTENT);
    assert!(commands.list_buckets().is_ok());
}
