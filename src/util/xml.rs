use bytes::Bytes;
use quick_xml::events::Event;

use crate::{error::Error, types};

pub(crate) const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn with_declaration(xml: String) -> Bytes {
    let mut out = String::with_capacity(XML_DECLARATION.len() + xml.len());
    out.push_str(XML_DECLARATION);
    out.push_str(&xml);
    Bytes::from(out)
}

pub fn encode_location(location: types::LocationConstraint) -> Result<Bytes, Error> {
    #[derive(serde::Serialize)]
    #[serde(rename = "CreateBucketConfiguration")]
    struct XmlCreateBucketConfiguration {
        #[serde(rename = "LocationConstraint")]
        location_constraint: &'static str,
    }

    let xml = quick_xml::se::to_string(&XmlCreateBucketConfiguration {
        location_constraint: location.code(),
    })
    .map_err(|e| {
        Error::encode(
            "failed to encode CreateBucketConfiguration XML",
            Some(Box::new(e)),
        )
    })?;
    Ok(with_declaration(xml))
}

pub fn encode_acl_email(entry: &types::AclEntry) -> Result<Bytes, Error> {
    let identifier = entry.identifier.trim();
    if identifier.is_empty() {
        return Err(Error::structure("identifier"));
    }

    #[derive(serde::Serialize)]
    #[serde(rename = "AccessControlList")]
    struct XmlOut<'a> {
        #[serde(rename = "Entries")]
        entries: XmlEntries<'a>,
    }

    #[derive(serde::Serialize)]
    struct XmlEntries<'a> {
        #[serde(rename = "Entry")]
        entries: Vec<XmlEntry<'a>>,
    }

    #[derive(serde::Serialize)]
    struct XmlEntry<'a> {
        #[serde(rename = "Permission")]
        permission: &'static str,
        #[serde(rename = "Scope")]
        scope: XmlScope<'a>,
    }

    #[derive(serde::Serialize)]
    struct XmlScope<'a> {
        #[serde(rename = "@type")]
        scope_type: &'static str,
        #[serde(rename = "EmailAddress")]
        email_address: &'a str,
    }

    let xml = quick_xml::se::to_string(&XmlOut {
        entries: XmlEntries {
            entries: vec![XmlEntry {
                permission: entry.permission.as_str(),
                scope: XmlScope {
                    scope_type: entry.scope_type.as_str(),
                    email_address: identifier,
                },
            }],
        },
    })
    .map_err(|e| Error::encode("failed to encode AccessControlList XML", Some(Box::new(e))))?;
    Ok(with_declaration(xml))
}

pub fn encode_cors(rule: &types::CorsRule) -> Result<Bytes, Error> {
    if rule.origins.is_empty() {
        return Err(Error::structure("origins"));
    }
    if rule.methods.is_empty() {
        return Err(Error::structure("methods"));
    }
    if rule.response_headers.is_empty() {
        return Err(Error::structure("response_headers"));
    }
    let max_age = rule.max_age.render();
    if max_age.trim().is_empty() {
        return Err(Error::structure("max_age"));
    }

    #[derive(serde::Serialize)]
    #[serde(rename = "CorsConfig")]
    struct XmlOut<'a> {
        #[serde(rename = "Cors")]
        cors: XmlCors<'a>,
    }

    #[derive(serde::Serialize)]
    struct XmlCors<'a> {
        #[serde(rename = "Origins")]
        origins: XmlOrigins<'a>,
        #[serde(rename = "Methods")]
        methods: XmlMethods<'a>,
        #[serde(rename = "ResponseHeaders")]
        response_headers: XmlResponseHeaders<'a>,
        #[serde(rename = "MaxAgeSec")]
        max_age_sec: String,
    }

    #[derive(serde::Serialize)]
    struct XmlOrigins<'a> {
        #[serde(rename = "Origin")]
        items: Vec<&'a str>,
    }

    #[derive(serde::Serialize)]
    struct XmlMethods<'a> {
        #[serde(rename = "Method")]
        items: Vec<&'a str>,
    }

    #[derive(serde::Serialize)]
    struct XmlResponseHeaders<'a> {
        #[serde(rename = "ResponseHeader")]
        items: Vec<&'a str>,
    }

    fn trimmed(values: &[String]) -> Vec<&str> {
        values.iter().map(|v| v.trim()).collect()
    }

    let xml = quick_xml::se::to_string(&XmlOut {
        cors: XmlCors {
            origins: XmlOrigins {
                items: trimmed(&rule.origins),
            },
            methods: XmlMethods {
                items: trimmed(&rule.methods),
            },
            response_headers: XmlResponseHeaders {
                items: trimmed(&rule.response_headers),
            },
            max_age_sec: max_age,
        },
    })
    .map_err(|e| Error::encode("failed to encode CorsConfig XML", Some(Box::new(e))))?;
    Ok(with_declaration(xml))
}

/// Re-indents an XML document with tabs, one element per line.
pub fn pretty_print(xml: &str) -> Result<String, Error> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut writer = quick_xml::Writer::new_with_indent(Vec::new(), b'\t', 1);

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => writer
                .write_event(event)
                .map_err(|e| Error::decode("failed to write XML", Some(Box::new(e))))?,
            Err(e) => {
                return Err(Error::decode(
                    "failed to parse XML body",
                    Some(Box::new(e)),
                ));
            }
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::decode("formatted XML is not UTF-8", Some(Box::new(e))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AclEntry, AclPermission, AclScopeType, CorsRule, LocationConstraint, MaxAge};

    fn text(bytes: Bytes) -> String {
        String::from_utf8_lossy(&bytes).to_string()
    }

    #[test]
    fn encodes_location_body() {
        let xml = text(encode_location(LocationConstraint::Usa).unwrap());
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><CreateBucketConfiguration><LocationConstraint>US</LocationConstraint></CreateBucketConfiguration>"
        );

        let xml = text(encode_location(LocationConstraint::Europe).unwrap());
        assert!(xml.contains("<LocationConstraint>EU</LocationConstraint>"));
    }

    #[test]
    fn encodes_acl_email_entry() {
        let entry = AclEntry::new(
            AclPermission::FullControl,
            AclScopeType::GroupByEmail,
            " team@example.com ",
        );
        let xml = text(encode_acl_email(&entry).unwrap());

        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<AccessControlList><Entries><Entry>"));
        assert!(xml.contains("<Permission>FULL_CONTROL</Permission>"));
        assert!(xml.contains(
            "<Scope type=\"GroupByEmail\"><EmailAddress>team@example.com</EmailAddress></Scope>"
        ));
        assert!(xml.ends_with("</Entry></Entries></AccessControlList>"));
    }

    #[test]
    fn acl_without_identifier_is_a_structure_error() {
        let entry = AclEntry::new(AclPermission::Read, AclScopeType::UserByEmail, "  ");
        match encode_acl_email(&entry) {
            Err(Error::Structure { field }) => assert_eq!(field, "identifier"),
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn encodes_cors_lists_in_order_and_trims_items() {
        let rule = CorsRule {
            origins: vec![" http://a.example".into(), "http://b.example ".into()],
            methods: vec!["GET".into(), " PUT".into()],
            response_headers: vec!["X-One".into()],
            max_age: MaxAge::Integer(1800),
        };
        let xml = text(encode_cors(&rule).unwrap());

        assert!(xml.contains(
            "<Origins><Origin>http://a.example</Origin><Origin>http://b.example</Origin></Origins>"
        ));
        assert!(xml.contains("<Methods><Method>GET</Method><Method>PUT</Method></Methods>"));
        assert!(xml.contains("<ResponseHeaders><ResponseHeader>X-One</ResponseHeader></ResponseHeaders>"));
        assert!(xml.contains("<MaxAgeSec>1800</MaxAgeSec>"));
        assert!(xml.contains("<CorsConfig><Cors><Origins>"));
    }

    #[test]
    fn cors_max_age_follows_value_type() {
        let mut rule = CorsRule::default();

        rule.max_age = MaxAge::Float(1800.5);
        assert!(text(encode_cors(&rule).unwrap()).contains("<MaxAgeSec>1800.500000</MaxAgeSec>"));

        rule.max_age = MaxAge::Text("3600".into());
        assert!(text(encode_cors(&rule).unwrap()).contains("<MaxAgeSec>3600</MaxAgeSec>"));
    }

    #[test]
    fn cors_with_missing_list_reports_field() {
        let mut rule = CorsRule::default();
        rule.methods.clear();
        match encode_cors(&rule) {
            Err(Error::Structure { field }) => assert_eq!(field, "methods"),
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn pretty_prints_with_tabs() {
        let out = pretty_print("<a><b>x</b><c/></a>").unwrap();
        assert!(out.starts_with("<a>"));
        assert!(out.contains("\n\t<b>x</b>"));
        assert!(out.trim_end().ends_with("</a>"));
    }

    #[test]
    fn pretty_print_rejects_mismatched_tags() {
        assert!(pretty_print("<a><b></a>").is_err());
    }
}
