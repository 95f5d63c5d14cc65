use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;

use crate::domain::{AccountReference, DispatchResult, MessageResult, OutboundMessage};

/// Namespace of every Esendex response document.
pub const ESENDEX_NAMESPACE: &str = "http://api.esendex.com/ns/";

const RESPONSE_ROOT: &str = "messageheaders";
const RESPONSE_MESSAGE: &str = "messageheader";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to encode XML request: {0}")]
    Encode(#[from] quick_xml::de::DeError),

    #[error("invalid XML response: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("unexpected response root element: {found}")]
    UnexpectedRoot { found: String },
}

#[derive(Debug, Serialize)]
#[serde(rename = "messages")]
struct DispatchRequestXml<'a> {
    #[serde(rename = "accountreference")]
    account_reference: &'a str,
    #[serde(rename = "sendat", skip_serializing_if = "Option::is_none")]
    send_at: Option<String>,
    #[serde(rename = "message")]
    messages: Vec<DispatchRequestMessageXml<'a>>,
}

#[derive(Debug, Serialize)]
struct DispatchRequestMessageXml<'a> {
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'a str,
    lang: &'a str,
    validity: i32,
    #[serde(rename = "characterset")]
    character_set: &'a str,
    retries: i32,
    body: &'a str,
}

impl<'a> From<&'a OutboundMessage> for DispatchRequestMessageXml<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            to: &message.to,
            message_type: &message.message_type,
            lang: &message.lang,
            validity: message.validity,
            character_set: &message.character_set,
            retries: message.retries,
            body: &message.body,
        }
    }
}

pub fn encode_dispatch_request(
    account_reference: &AccountReference,
    send_at: Option<&DateTime<FixedOffset>>,
    messages: &[OutboundMessage],
) -> Result<String, TransportError> {
    let request = DispatchRequestXml {
        account_reference: account_reference.as_str(),
        send_at: send_at.map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        messages: messages.iter().map(Into::into).collect(),
    };

    Ok(quick_xml::se::to_string(&request)?)
}

pub fn decode_dispatch_response(xml: &str) -> Result<DispatchResult, TransportError> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    let name = root.tag_name();

    if name.name() != RESPONSE_ROOT || name.namespace() != Some(ESENDEX_NAMESPACE) {
        let found = match name.namespace() {
            Some(ns) => format!("{{{ns}}}{}", name.name()),
            None => name.name().to_owned(),
        };
        return Err(TransportError::UnexpectedRoot { found });
    }

    let messages = root
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == RESPONSE_MESSAGE)
        .map(|node| MessageResult {
            uri: node.attribute("uri").unwrap_or_default().to_owned(),
            id: node.attribute("id").unwrap_or_default().to_owned(),
        })
        .collect();

    Ok(DispatchResult {
        batch_id: root.attribute("batchid").unwrap_or_default().to_owned(),
        messages,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn reference() -> AccountReference {
        AccountReference::new("EX0000000").unwrap()
    }

    fn voice_message() -> OutboundMessage {
        OutboundMessage {
            to: "447700900123".to_owned(),
            message_type: "Voice".to_owned(),
            lang: "en-GB".to_owned(),
            validity: 24,
            character_set: "GSM".to_owned(),
            retries: 3,
            body: "Fish & chips <tonight>".to_owned(),
        }
    }

    fn child_texts(node: roxmltree::Node<'_, '_>) -> Vec<(String, String)> {
        node.children()
            .filter(|it| it.is_element())
            .map(|it| {
                (
                    it.tag_name().name().to_owned(),
                    it.text().unwrap_or_default().to_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn encode_writes_fields_in_wire_order() {
        let xml = encode_dispatch_request(&reference(), None, &[voice_message()]).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "messages");

        let top = root
            .children()
            .filter(|it| it.is_element())
            .map(|it| it.tag_name().name())
            .collect::<Vec<_>>();
        assert_eq!(top, vec!["accountreference", "message"]);

        let message = root
            .children()
            .find(|it| it.has_tag_name("message"))
            .unwrap();
        assert_eq!(
            child_texts(message),
            vec![
                ("to".to_owned(), "447700900123".to_owned()),
                ("type".to_owned(), "Voice".to_owned()),
                ("lang".to_owned(), "en-GB".to_owned()),
                ("validity".to_owned(), "24".to_owned()),
                ("characterset".to_owned(), "GSM".to_owned()),
                ("retries".to_owned(), "3".to_owned()),
                ("body".to_owned(), "Fish & chips <tonight>".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_keeps_message_order() {
        let messages = (0..5)
            .map(|idx| OutboundMessage::new(format!("4477009001{idx:02}"), format!("m{idx}")))
            .collect::<Vec<_>>();
        let xml = encode_dispatch_request(&reference(), None, &messages).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();

        let recipients = doc
            .descendants()
            .filter(|it| it.has_tag_name("to"))
            .map(|it| it.text().unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        let expected = messages.iter().map(|m| m.to.clone()).collect::<Vec<_>>();
        assert_eq!(recipients, expected);
    }

    #[test]
    fn encode_places_send_at_before_messages() {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, 9, 30, 0)
            .unwrap();
        let xml =
            encode_dispatch_request(&reference(), Some(&at), &[voice_message()]).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();

        let top = doc
            .root_element()
            .children()
            .filter(|it| it.is_element())
            .map(|it| {
                (
                    it.tag_name().name().to_owned(),
                    it.text().map(str::to_owned),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(top[0].0, "accountreference");
        assert_eq!(top[0].1.as_deref(), Some("EX0000000"));
        assert_eq!(top[1].0, "sendat");
        assert_eq!(top[1].1.as_deref(), Some("2026-10-18T09:30:00Z"));
        assert_eq!(top[2].0, "message");
    }

    #[test]
    fn encode_send_at_keeps_offset() {
        let at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, 11, 30, 0)
            .unwrap();
        let xml = encode_dispatch_request(&reference(), Some(&at), &[]).unwrap();
        assert!(xml.contains("<sendat>2026-10-18T11:30:00+02:00</sendat>"));
    }

    #[test]
    fn encode_empty_batch_has_no_message_elements() {
        let xml = encode_dispatch_request(&reference(), None, &[]).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(
            doc.descendants().filter(|it| it.has_tag_name("message")).count(),
            0
        );
        assert!(doc.descendants().any(|it| it.has_tag_name("accountreference")));
    }

    #[test]
    fn decode_maps_batch_id_and_headers_in_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
        <messageheaders batchid="B1" xmlns="http://api.esendex.com/ns/">
          <messageheader uri="https://api.esendex.com/v1.0/messageheaders/M1" id="M1" />
          <messageheader uri="https://api.esendex.com/v1.0/messageheaders/M2" id="M2" />
        </messageheaders>"#;

        let result = decode_dispatch_response(xml).unwrap();
        assert_eq!(result.batch_id, "B1");
        assert_eq!(
            result.messages,
            vec![
                MessageResult {
                    uri: "https://api.esendex.com/v1.0/messageheaders/M1".to_owned(),
                    id: "M1".to_owned(),
                },
                MessageResult {
                    uri: "https://api.esendex.com/v1.0/messageheaders/M2".to_owned(),
                    id: "M2".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn decode_defaults_missing_attributes_to_empty() {
        let xml = r#"<messageheaders xmlns="http://api.esendex.com/ns/">
          <messageheader id="M1"/>
        </messageheaders>"#;

        let result = decode_dispatch_response(xml).unwrap();
        assert_eq!(result.batch_id, "");
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].uri, "");
        assert_eq!(result.messages[0].id, "M1");
    }

    #[test]
    fn decode_rejects_root_outside_esendex_namespace() {
        let xml = r#"<messageheaders batchid="B1"><messageheader id="M1"/></messageheaders>"#;
        let err = decode_dispatch_response(xml).unwrap_err();
        assert!(matches!(err, TransportError::UnexpectedRoot { .. }));
    }

    #[test]
    fn decode_rejects_unexpected_root() {
        let xml = r#"<response xmlns="http://api.esendex.com/ns/"><errors/></response>"#;
        let err = decode_dispatch_response(xml).unwrap_err();
        match err {
            TransportError::UnexpectedRoot { found } => {
                assert_eq!(found, "{http://api.esendex.com/ns/}response");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_malformed_xml() {
        let err = decode_dispatch_response("<messageheaders batchid=").unwrap_err();
        assert!(matches!(err, TransportError::Xml(_)));
    }
}
