//! Text rendering of responses for the console.

use std::fmt::Write as _;

use crate::{
    types::Response,
    util::{text::truncate_snippet, xml::pretty_print},
};

/// Banner printed above the header lines.
pub const HEADER_BANNER: &str = "<---------- Response header ------------->";
/// Banner printed above the body.
pub const BODY_BANNER: &str = "<---------- Response body ------------->";

const MAX_RAW_BODY: usize = 4096;

/// Renders the status and every header as `key : value` lines, in the order
/// the response delivered them.
pub fn render_headers(resp: &Response) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER_BANNER}");
    let _ = writeln!(out, "status : {}", resp.status.as_u16());
    for (name, value) in resp.headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        let _ = writeln!(out, "{} : {value}", name.as_str());
    }
    out
}

/// Pretty-prints an XML body with tab indentation. Bodies that are not XML are
/// shown verbatim, cut to a bounded snippet. Returns `None` for empty bodies.
pub fn render_body(resp: &Response) -> Option<String> {
    if resp.body.is_empty() {
        return None;
    }

    let text = resp.body_text();
    let rendered = match pretty_print(&text) {
        Ok(pretty) if !pretty.trim().is_empty() => pretty,
        _ => truncate_snippet(&text, MAX_RAW_BODY),
    };
    Some(format!("{BODY_BANNER}\n{rendered}\n"))
}

/// Headers followed, when requested and present, by the body.
pub fn render_response(resp: &Response, include_body: bool) -> String {
    let mut out = render_headers(resp);
    if include_body && let Some(body) = render_body(resp) {
        out.push_str(&body);
    }
    out
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderValue, StatusCode};

    use super::*;

    fn response(body: &'static str) -> Response {
        let mut resp = Response::new(StatusCode::OK);
        resp.headers
            .append("content-type", HeaderValue::from_static("application/xml"));
        resp.headers
            .append("x-goog-stored-content-length", HeaderValue::from_static("12"));
        resp.body = Bytes::from_static(body.as_bytes());
        resp
    }

    #[test]
    fn headers_render_as_key_value_lines_in_order() {
        let out = render_headers(&response(""));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                HEADER_BANNER,
                "status : 200",
                "content-type : application/xml",
                "x-goog-stored-content-length : 12",
            ]
        );
    }

    #[test]
    fn xml_body_is_pretty_printed() {
        let resp = response(
            "<?xml version='1.0' encoding='UTF-8'?><LocationConstraint>US</LocationConstraint>",
        );
        let out = render_body(&resp).unwrap();
        assert!(out.starts_with(BODY_BANNER));
        assert!(out.contains("<LocationConstraint>US</LocationConstraint>"));
    }

    #[test]
    fn non_xml_body_is_shown_raw() {
        let resp = response("plain text <unbalanced");
        let out = render_body(&resp).unwrap();
        assert!(out.contains("plain text <unbalanced"));
    }

    #[test]
    fn empty_body_is_omitted() {
        let out = render_response(&response(""), true);
        assert!(!out.contains(BODY_BANNER));
    }
}
