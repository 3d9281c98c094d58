use std::{io::Read, time::Duration};

#[cfg(feature = "metrics")]
use std::time::Instant;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::{
    error::{Error, Result},
    transport::{Transport, TransportError},
    types::Response,
};

/// Blocking HTTP transport backed by a shared `ureq` agent.
///
/// Every status is returned as a [`Response`]; only failures to get a response
/// at all become [`TransportError`]s. Requests are sent exactly once.
pub struct HttpTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(user_agent: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        if timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::invalid_config("timeout must be greater than zero"));
        }

        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
            user_agent: user_agent.unwrap_or_else(default_user_agent),
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Bytes>,
    ) -> std::result::Result<Response, TransportError> {
        #[cfg(feature = "metrics")]
        metrics::counter!("gcs_http_requests_total", "method" => method_label(method))
            .increment(1);
        #[cfg(feature = "tracing")]
        let _guard = tracing::debug_span!(
            "gcs.http",
            method = %method,
            host = url.host_str().unwrap_or(""),
            path = url.path(),
        )
        .entered();
        #[cfg(feature = "metrics")]
        let start = Instant::now();
        #[cfg(feature = "tracing")]
        tracing::debug!(headers = ?redacted_headers(headers), "sending request");

        let result = match method.as_str() {
            "GET" => self.apply_headers(self.agent.get(url.as_str()), headers).call(),
            "HEAD" => self.apply_headers(self.agent.head(url.as_str()), headers).call(),
            "DELETE" => self
                .apply_headers(self.agent.delete(url.as_str()), headers)
                .call(),
            "PUT" => {
                let req = self.apply_headers(self.agent.put(url.as_str()), headers);
                match body {
                    Some(b) => req.send(b.as_ref()),
                    None => req.send_empty(),
                }
            }
            "POST" => {
                let req = self.apply_headers(self.agent.post(url.as_str()), headers);
                match body {
                    Some(b) => req.send(b.as_ref()),
                    None => req.send_empty(),
                }
            }
            other => {
                return Err(TransportError::failed(
                    format!("unsupported HTTP method: {other}"),
                    None,
                ));
            }
        };

        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                #[cfg(feature = "metrics")]
                metrics::counter!(
                    "gcs_http_errors_total",
                    "method" => method_label(method),
                    "kind" => "transport"
                )
                .increment(1);
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, "request failed without a response");

                return Err(map_ureq_error(err, method, url));
            }
        };

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(
                "gcs_http_responses_total",
                "method" => method_label(method),
                "class" => status_class(resp.status()),
            )
            .increment(1);
            metrics::histogram!(
                "gcs_http_request_duration_seconds",
                "method" => method_label(method),
            )
            .record(start.elapsed().as_secs_f64());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            status = resp.status().as_u16(),
            headers = ?resp.headers(),
            "response received"
        );

        let (parts, body) = resp.into_parts();
        let mut out = Vec::new();
        body.into_reader().read_to_end(&mut out).map_err(|e| {
            TransportError::failed(
                format!("failed to read response body: {}", request_context(method, url)),
                Some(Box::new(e)),
            )
        })?;

        Ok(Response {
            status: parts.status,
            reason: reason_phrase(parts.status),
            headers: parts.headers,
            body: Bytes::from(out),
        })
    }
}

impl HttpTransport {
    fn apply_headers<B>(
        &self,
        mut req: ureq::RequestBuilder<B>,
        headers: &HeaderMap,
    ) -> ureq::RequestBuilder<B> {
        req = req.header(http::header::USER_AGENT, self.user_agent.as_str());
        // Object bytes are stored as uploaded; never let the agent decode them.
        if !headers.contains_key(http::header::ACCEPT_ENCODING) {
            req = req.header(http::header::ACCEPT_ENCODING, "identity");
        }
        for (name, value) in headers.iter() {
            // ureq frames the body itself and derives Host from the URL.
            if name == http::header::CONTENT_LENGTH || name == http::header::HOST {
                continue;
            }
            let Ok(value_str) = value.to_str() else {
                continue;
            };
            req = req.header(name.as_str(), value_str);
        }

        if let Some(timeout) = self.timeout {
            req = req.config().timeout_global(Some(timeout)).build();
        }

        req
    }
}

fn map_ureq_error(err: ureq::Error, method: &Method, url: &Url) -> TransportError {
    match err {
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportError::HostNotFound,
        ureq::Error::Io(ref io) if io.kind() == std::io::ErrorKind::ConnectionRefused => {
            TransportError::HostNotFound
        }
        other => TransportError::failed(
            format!("request failed: {}", request_context(method, url)),
            Some(Box::new(other)),
        ),
    }
}

#[cfg(feature = "tracing")]
fn redacted_headers(headers: &HeaderMap) -> Vec<(&str, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if value.is_sensitive() || name == http::header::AUTHORIZATION {
                "<redacted>".to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (name.as_str(), shown)
        })
        .collect()
}

fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

fn request_context(method: &Method, url: &Url) -> String {
    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    format!("{method} {authority}{}", url.path())
}

#[cfg(feature = "metrics")]
fn status_class(status: StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

#[cfg(feature = "metrics")]
fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "PUT" => "PUT",
        "HEAD" => "HEAD",
        "DELETE" => "DELETE",
        "POST" => "POST",
        _ => "OTHER",
    }
}

fn default_user_agent() -> String {
    format!("gcs-xml/{}", env!("CARGO_PKG_VERSION"))
}
