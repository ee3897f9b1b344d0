use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One table row: column name -> cell value, in wire order
pub type TableRow = serde_json::Map<String, Value>;

/// Artifact kinds known to the widget, addressed by their wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    #[serde(rename = "artifact-table")]
    Table,
    #[serde(rename = "artifact-list")]
    List,
    #[serde(rename = "artifact-filing")]
    Filing,
}

impl ArtifactKind {
    pub fn wire_name(&self) -> &'static str {
        match self {
            ArtifactKind::Table => "artifact-table",
            ArtifactKind::List => "artifact-list",
            ArtifactKind::Filing => "artifact-filing",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "artifact-table" => Some(ArtifactKind::Table),
            "artifact-list" => Some(ArtifactKind::List),
            "artifact-filing" => Some(ArtifactKind::Filing),
            _ => None,
        }
    }
}

/// Table artifact as produced by the server.
///
/// `fact` is the display label used by the table selector. The remaining
/// optional fields form the metadata panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableArtifact {
    pub fact: String,
    #[serde(default)]
    pub table: Vec<TableRow>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cik: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
}

impl TableArtifact {
    pub fn new(fact: impl Into<String>, table: Vec<TableRow>) -> Self {
        Self {
            fact: fact.into(),
            table,
            ..Default::default()
        }
    }

    /// Column names, fixed by the key order of the first row
    pub fn columns(&self) -> Vec<String> {
        self.table
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Filing document restructured for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingArtifact {
    pub html: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
}

/// Text shown for a cell. Missing and `null` cells are empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Accepts strings, numbers and booleans; blank strings and `null` become `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(other) => Some(cell_text(Some(&other))),
    })
}
