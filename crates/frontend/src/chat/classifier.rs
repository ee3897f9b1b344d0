//! Response classifier: turns one `ResponseEnvelope` into render actions.

use super::transcript::Sender;
use contracts::chat::{ArtifactKind, FilingArtifact, ResponseEnvelope, TableArtifact};
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const UNSUPPORTED_MESSAGE: &str =
    "I have received a response, but it is not a supported type.";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Sorry, there was an error processing your request.";

/// Typed artifact ready for a renderer
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// Non-empty batch; the first table is rendered
    Table(Vec<TableArtifact>),
    List(Vec<String>),
    Filing(FilingArtifact),
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Table(_) => ArtifactKind::Table,
            Artifact::List(_) => ArtifactKind::List,
            Artifact::Filing(_) => ArtifactKind::Filing,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderAction {
    AppendTurn(Sender, String),
    RenderArtifact(Artifact),
}

/// Bot turn announcing a freshly rendered artifact
pub fn announcement(kind: ArtifactKind) -> String {
    format!(
        "I have prepared an {} for you. Please check the artifact view.",
        kind.wire_name()
    )
}

/// Classify one envelope. Never fails: anything unrecognised becomes the
/// "not supported" turn.
pub fn classify(envelope: ResponseEnvelope) -> Vec<RenderAction> {
    match envelope {
        ResponseEnvelope::Text { content } => vec![RenderAction::AppendTurn(Sender::Bot, content)],
        ResponseEnvelope::Artifact {
            artifact_type,
            content,
            data,
            section_id,
        } => match decode_artifact(&artifact_type, content, data, section_id) {
            Some(artifact) => vec![
                RenderAction::AppendTurn(Sender::Bot, announcement(artifact.kind())),
                RenderAction::RenderArtifact(artifact),
            ],
            None => {
                log::warn!("Unsupported artifact type: {}", artifact_type);
                unsupported()
            }
        },
        ResponseEnvelope::Unsupported => unsupported(),
    }
}

fn unsupported() -> Vec<RenderAction> {
    vec![RenderAction::AppendTurn(
        Sender::Bot,
        UNSUPPORTED_MESSAGE.to_string(),
    )]
}

/// A table payload arrives either as one object or as a batch
#[derive(Deserialize)]
#[serde(untagged)]
enum TableBatch {
    Many(Vec<TableArtifact>),
    One(TableArtifact),
}

fn decode_artifact(
    artifact_type: &str,
    content: Value,
    data: Option<Value>,
    section_id: Option<String>,
) -> Option<Artifact> {
    match ArtifactKind::from_wire(artifact_type)? {
        ArtifactKind::Table => {
            let tables = match serde_json::from_value::<TableBatch>(content) {
                Ok(TableBatch::Many(tables)) => tables,
                Ok(TableBatch::One(table)) => vec![table],
                Err(e) => {
                    log::warn!("Malformed table artifact: {}", e);
                    return None;
                }
            };
            if tables.is_empty() {
                return None;
            }
            Some(Artifact::Table(tables))
        }
        ArtifactKind::List => match serde_json::from_value::<Vec<String>>(content) {
            Ok(urls) => Some(Artifact::List(urls)),
            Err(e) => {
                log::warn!("Malformed list artifact: {}", e);
                None
            }
        },
        ArtifactKind::Filing => {
            let Value::String(html) = content else {
                log::warn!("Filing artifact without HTML content");
                return None;
            };
            Some(Artifact::Filing(FilingArtifact {
                html,
                data: data.unwrap_or(Value::Null),
                anchor_id: section_id.filter(|id| !id.trim().is_empty()),
            }))
        }
    }
}

/// Single in-flight flag guarding response dispatch.
///
/// A response arriving while another one is being applied is dropped, not queued.
#[derive(Debug, Clone, Default)]
pub struct DispatchGate {
    busy: Arc<AtomicBool>,
}

impl DispatchGate {
    pub fn try_enter(&self) -> Option<DispatchPermit> {
        if self.busy.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(DispatchPermit {
                busy: Arc::clone(&self.busy),
            })
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped
#[derive(Debug)]
pub struct DispatchPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for DispatchPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
