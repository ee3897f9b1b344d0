use super::artifact::{ArtifactKind, TableArtifact};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reply body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(deserialize_with = "envelope_or_unsupported")]
    pub response: ResponseEnvelope,
    /// Running token total of the server-side assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

/// Tagged response produced by the server for one request.
///
/// Artifact payloads stay untyped on the wire; the client decides which
/// renderer applies from `artifact_type`. Unknown `type` tags decode to
/// `Unsupported` instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Text {
        content: String,
    },
    Artifact {
        artifact_type: String,
        #[serde(default)]
        content: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section_id: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

/// A known tag with a malformed body is not a protocol violation: it decodes
/// to `Unsupported` like an unknown tag
fn envelope_or_unsupported<'de, D>(deserializer: D) -> Result<ResponseEnvelope, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or(ResponseEnvelope::Unsupported))
}

impl ResponseEnvelope {
    pub fn text(content: impl Into<String>) -> Self {
        ResponseEnvelope::Text {
            content: content.into(),
        }
    }

    /// Batch of tables, rendered starting from the first one
    pub fn tables(tables: &[TableArtifact]) -> Result<Self, serde_json::Error> {
        Ok(ResponseEnvelope::Artifact {
            artifact_type: ArtifactKind::Table.wire_name().to_string(),
            content: serde_json::to_value(tables)?,
            data: None,
            section_id: None,
        })
    }

    pub fn urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResponseEnvelope::Artifact {
            artifact_type: ArtifactKind::List.wire_name().to_string(),
            content: Value::Array(urls.into_iter().map(|u| Value::String(u.into())).collect()),
            data: None,
            section_id: None,
        }
    }

    /// Filing document: `content` carries the HTML, `section_id` the anchor to scroll to
    pub fn filing(html: impl Into<String>, data: Value, section_id: Option<String>) -> Self {
        ResponseEnvelope::Artifact {
            artifact_type: ArtifactKind::Filing.wire_name().to_string(),
            content: Value::String(html.into()),
            data: Some(data),
            section_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_reply_decodes() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":{"type":"text","content":"hi"}}"#).unwrap();
        assert_eq!(reply.response, ResponseEnvelope::text("hi"));
        assert_eq!(reply.total_tokens, None);
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":{"type":"image","url":"x"},"total_tokens":42}"#)
                .unwrap();
        assert_eq!(reply.response, ResponseEnvelope::Unsupported);
        assert_eq!(reply.total_tokens, Some(42));
    }

    #[test]
    fn test_missing_response_is_rejected() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"reply":"hi"}"#).is_err());
        assert!(serde_json::from_str::<ChatReply>(r#"{"response":"hi"}"#).is_err());
    }

    #[test]
    fn test_filing_constructor_uses_wire_fields() {
        let envelope = ResponseEnvelope::filing(
            "<p id='item7'>x</p>",
            json!({"form": "10-K"}),
            Some("item7".into()),
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "artifact",
                "artifact_type": "artifact-filing",
                "content": "<p id='item7'>x</p>",
                "data": {"form": "10-K"},
                "section_id": "item7"
            })
        );
    }

    #[test]
    fn test_tables_constructor_sends_array() {
        let tables = vec![TableArtifact::new("A", vec![]), TableArtifact::new("B", vec![])];
        let envelope = ResponseEnvelope::tables(&tables).unwrap();
        match envelope {
            ResponseEnvelope::Artifact {
                artifact_type,
                content,
                ..
            } => {
                assert_eq!(artifact_type, "artifact-table");
                assert_eq!(content.as_array().map(|a| a.len()), Some(2));
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }
}
