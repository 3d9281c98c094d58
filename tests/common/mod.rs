#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use url::Url;

use gcs_xml::{
    Commands, ProjectId, Response, Session, SessionConfig, StaticTokenProvider, Transport,
    TransportError,
};

pub(crate) const PROJECT_ID: &str = "test-project";
pub(crate) const TOKEN: &str = "ya29.integration-token";

/// One request as the transport saw it.
#[derive(Clone, Debug)]
pub(crate) struct Captured {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Bytes>,
}

impl Captured {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub(crate) fn body_text(&self) -> String {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

/// Replays queued responses and records every request. An empty queue
/// answers `200 OK`.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Result<Response, TransportError>>>,
    requests: Mutex<Vec<Captured>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, resp: Response) {
        self.replies.lock().unwrap().push_back(Ok(resp));
    }

    pub(crate) fn reply_status(&self, status: StatusCode) {
        self.reply(Response::new(status));
    }

    pub(crate) fn fail(&self, err: TransportError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Bytes>,
    ) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(Captured {
            method: method.clone(),
            url: url.clone(),
            headers: headers.clone(),
            body: body.cloned(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Response::new(StatusCode::OK)))
    }
}

pub(crate) fn config() -> SessionConfig {
    SessionConfig::new(ProjectId::new(PROJECT_ID).unwrap())
}

/// Session without an authorization layer.
pub(crate) fn session(transport: Arc<MockTransport>) -> Session {
    Session::new(config(), transport)
}

/// Facade authorized with a static token.
pub(crate) fn commands(transport: Arc<MockTransport>) -> Commands {
    let auth = Arc::new(StaticTokenProvider::new(TOKEN).unwrap());
    Commands::connect(config(), transport, auth).unwrap()
}

pub(crate) fn response_with_header(status: StatusCode, name: &'static str, value: &str) -> Response {
    let mut resp = Response::new(status);
    resp.headers
        .insert(name, HeaderValue::from_str(value).unwrap());
    resp
}
