//! Sends one [`Request`] through the session transport and classifies the
//! outcome.

use http::{HeaderMap, HeaderValue, Method, header::CONTENT_LENGTH};

use crate::{
    error::{Error, Result},
    session::Session,
    transport::TransportError,
    types::{Request, Response},
    util,
};

/// Sends `request` and returns the response when its status is below 300.
///
/// Header rules:
/// - no headers at all: `x-goog-project-id` and `Content-Length: 0` are added;
/// - PUT, POST, or a body: `Content-Length` is the exact body length, or `0`
///   when there is no body and no explicit value.
///
/// An unreachable host is reported as [`Error::server_not_found`]; any status
/// of 300 or above as [`Error::storage`]. Nothing is retried.
pub fn dispatch(session: &Session, request: Request) -> Result<Response> {
    let Request {
        method,
        host,
        path,
        query,
        mut headers,
        body,
    } = request;

    if headers.is_empty() {
        headers = default_headers(session)?;
    }
    apply_content_length(&method, &mut headers, body.as_ref().map(|b| b.len()));

    let url = util::url::resolve_url(&host, &path, query.as_deref())?;

    let resp = match session
        .transport()
        .send(&method, &url, &headers, body.as_ref())
    {
        Ok(resp) => resp,
        Err(TransportError::HostNotFound) => return Err(Error::server_not_found()),
        Err(TransportError::Failed { message, source }) => {
            return Err(Error::transport(message, source));
        }
    };

    if resp.status.as_u16() >= 300 {
        return Err(Error::storage(resp.status, resp.reason));
    }

    Ok(resp)
}

fn default_headers(session: &Session) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let project = HeaderValue::from_str(session.project_id().as_str())
        .map_err(|_| Error::invalid_config("project id is not a valid header value"))?;
    headers.insert(util::headers::PROJECT_ID, project);
    headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    Ok(headers)
}

fn apply_content_length(method: &Method, headers: &mut HeaderMap, body_len: Option<usize>) {
    let sends_body = *method == Method::PUT || *method == Method::POST;
    match body_len {
        Some(len) => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }
        None if sends_body && !headers.contains_key(CONTENT_LENGTH) => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;
    use http::StatusCode;
    use url::Url;

    use super::*;
    use crate::{
        config::{ProjectId, SessionConfig},
        error::StorageStatus,
        transport::Transport,
    };

    struct Recorder {
        reply: Mutex<Option<std::result::Result<Response, TransportError>>>,
        seen: Mutex<Vec<(Method, Url, HeaderMap)>>,
    }

    impl Recorder {
        fn replying(reply: std::result::Result<Response, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for Recorder {
        fn send(
            &self,
            method: &Method,
            url: &Url,
            headers: &HeaderMap,
            _body: Option<&Bytes>,
        ) -> std::result::Result<Response, TransportError> {
            self.seen
                .lock()
                .unwrap()
                .push((method.clone(), url.clone(), headers.clone()));
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Response::new(StatusCode::OK)))
        }
    }

    fn session(transport: Arc<Recorder>) -> Session {
        let config = SessionConfig::new(ProjectId::new("proj-42").unwrap());
        Session::new(config, transport)
    }

    #[test]
    fn derives_default_headers_when_none_given() {
        let rec = Recorder::replying(Ok(Response::new(StatusCode::OK)));
        dispatch(
            &session(rec.clone()),
            Request::new("storage.googleapis.com"),
        )
        .unwrap();

        let seen = rec.seen.lock().unwrap();
        let (method, url, headers) = &seen[0];
        assert_eq!(*method, Method::GET);
        assert_eq!(url.as_str(), "http://storage.googleapis.com/");
        assert_eq!(headers.get("x-goog-project-id").unwrap(), "proj-42");
        assert_eq!(headers.get(CONTENT_LENGTH).unwrap(), "0");
    }

    #[test]
    fn body_length_overrides_content_length() {
        let rec = Recorder::replying(Ok(Response::new(StatusCode::OK)));
        let request = Request::new("b.storage.googleapis.com")
            .method(Method::PUT)
            .query("cors")
            .body(Bytes::from_static(b"<CorsConfig/>"));
        dispatch(&session(rec.clone()), request).unwrap();

        let seen = rec.seen.lock().unwrap();
        assert_eq!(seen[0].2.get(CONTENT_LENGTH).unwrap(), "13");
        assert_eq!(seen[0].1.query(), Some("cors"));
    }

    #[test]
    fn explicit_headers_skip_project_header() {
        let rec = Recorder::replying(Ok(Response::new(StatusCode::OK)));
        let request = Request::new("b.storage.googleapis.com")
            .method(Method::PUT)
            .key("copy.txt")
            .header("x-goog-copy-source", "src/a.txt")
            .unwrap()
            .header("content-length", "512")
            .unwrap();
        dispatch(&session(rec.clone()), request).unwrap();

        let seen = rec.seen.lock().unwrap();
        let headers = &seen[0].2;
        assert!(headers.get("x-goog-project-id").is_none());
        assert_eq!(headers.get(CONTENT_LENGTH).unwrap(), "512");
    }

    #[test]
    fn put_without_body_gets_zero_length() {
        let rec = Recorder::replying(Ok(Response::new(StatusCode::OK)));
        let request = Request::new("b.storage.googleapis.com")
            .method(Method::PUT)
            .header("x-goog-acl", "private")
            .unwrap();
        dispatch(&session(rec.clone()), request).unwrap();

        assert_eq!(
            rec.seen.lock().unwrap()[0].2.get(CONTENT_LENGTH).unwrap(),
            "0"
        );
    }

    #[test]
    fn classifies_statuses() {
        let rec = Recorder::replying(Ok(Response::new(StatusCode::NOT_FOUND)));
        let err = dispatch(&session(rec), Request::new("b.storage.googleapis.com")).unwrap_err();
        assert_eq!(
            err.status(),
            Some(StorageStatus::Http(StatusCode::NOT_FOUND))
        );
        assert_eq!(err.to_string(), "404: Not Found");

        let rec = Recorder::replying(Ok(Response::new(StatusCode::MOVED_PERMANENTLY)));
        assert!(dispatch(&session(rec), Request::new("b.storage.googleapis.com")).is_err());

        let rec = Recorder::replying(Ok(Response::new(StatusCode::NO_CONTENT)));
        let resp = dispatch(&session(rec), Request::new("b.storage.googleapis.com")).unwrap();
        assert_eq!(resp.status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn unreachable_host_is_server_not_found() {
        let rec = Recorder::replying(Err(TransportError::HostNotFound));
        let err = dispatch(&session(rec), Request::new("nowhere.invalid")).unwrap_err();
        assert_eq!(err.status(), Some(StorageStatus::ServerNotFound));
        assert_eq!(err.to_string(), "not found: Server not found.");
    }

    #[test]
    fn other_transport_failures_stay_transport_errors() {
        let rec = Recorder::replying(Err(TransportError::failed("timed out", None)));
        let err = dispatch(&session(rec), Request::new("b.storage.googleapis.com")).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert_eq!(err.status(), None);
    }
}
