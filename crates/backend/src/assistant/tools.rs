//! Tools offered to the model and their execution against EDGAR.
//!
//! Each tool produces a `ResponseEnvelope` for the widget plus a short
//! summary that goes back into the conversation history.

use crate::sec::facts::{concept_tables, rank_tables};
use crate::sec::filings::{recent_filings, section_anchor};
use crate::sec::{Cik, FilingSource, SecError};
use crate::shared::llm::{ToolCall, ToolDefinition};
use contracts::chat::ResponseEnvelope;
use thiserror::Error;

pub const DEFAULT_FILINGS_LIMIT: usize = 10;
pub const MAX_FILINGS_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Sec(#[from] SecError),

    #[error("Missing argument '{0}'")]
    MissingArgument(&'static str),

    #[error("Unknown tool: '{0}'")]
    UnknownTool(String),

    #[error("Failed to encode tool result: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub envelope: ResponseEnvelope,
    /// Fed back to the model as the tool message
    pub summary: String,
}

pub fn sec_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "identifier_to_cik".into(),
            description: "Convert a company's ticker to a CIK".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "ticker": {"type": "string", "description": "The ticker to convert to a CIK"}
                },
                "required": ["ticker"]
            }),
        },
        ToolDefinition {
            name: "get_company_concept".into(),
            description: "Get specific XBRL facts for a company".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "ticker": {"type": "string", "description": "The ticker of the company to get facts for"},
                    "search_term": {"type": "string", "description": "The concept to search for (e.g., 'revenue')"}
                },
                "required": ["ticker", "search_term"]
            }),
        },
        ToolDefinition {
            name: "get_recent_filings".into(),
            description: "List links to a company's most recent filings, optionally of one form type".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "ticker": {"type": "string", "description": "The ticker of the company"},
                    "form": {"type": "string", "description": "Form type filter, e.g. '10-K', '10-Q', '8-K'"},
                    "limit": {"type": "integer", "description": "Maximum number of filings to list (default 10)"}
                },
                "required": ["ticker"]
            }),
        },
        ToolDefinition {
            name: "get_filing".into(),
            description: "Open a filing document from the SEC archive, optionally at a section".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "The sec.gov URL of the filing document"},
                    "section": {"type": "string", "description": "Title of the section to jump to"}
                },
                "required": ["url"]
            }),
        },
    ]
}

pub async fn execute_tool_call(
    call: &ToolCall,
    source: &dyn FilingSource,
    max_tables: usize,
) -> Result<ToolOutput, ToolError> {
    match call.name.as_str() {
        "identifier_to_cik" => {
            let ticker = require_arg(&call.arguments, "ticker")?;
            let cik = lookup_cik(source, &ticker).await?;
            Ok(ToolOutput {
                envelope: ResponseEnvelope::text(cik.padded()),
                summary: format!("CIK of {} is {}", ticker, cik),
            })
        }

        "get_company_concept" => {
            let ticker = require_arg(&call.arguments, "ticker")?;
            let search_term = require_arg(&call.arguments, "search_term")?;
            let cik = lookup_cik(source, &ticker).await?;
            let facts = source.company_facts(cik).await?;
            let tables = rank_tables(concept_tables(&facts), &search_term, max_tables);

            if tables.is_empty() {
                let message = format!("No tables matching '{}' were found for {}.", search_term, ticker);
                return Ok(ToolOutput {
                    envelope: ResponseEnvelope::text(message.clone()),
                    summary: message,
                });
            }
            let labels: Vec<&str> = tables
                .iter()
                .map(|t| t.label.as_deref().unwrap_or(&t.fact))
                .collect();
            let company = if facts.entity_name.is_empty() {
                ticker.as_str()
            } else {
                facts.entity_name.as_str()
            };
            Ok(ToolOutput {
                summary: format!(
                    "Prepared {} tables for {}: {}",
                    tables.len(),
                    company,
                    labels.join(", ")
                ),
                envelope: ResponseEnvelope::tables(&tables)?,
            })
        }

        "get_recent_filings" => {
            let ticker = require_arg(&call.arguments, "ticker")?;
            let form = parse_string_arg(&call.arguments, "form");
            let limit = parse_u64_arg(&call.arguments, "limit")
                .map(|l| (l as usize).clamp(1, MAX_FILINGS_LIMIT))
                .unwrap_or(DEFAULT_FILINGS_LIMIT);
            let cik = lookup_cik(source, &ticker).await?;
            let submissions = source.submissions(cik).await?;
            let filings = recent_filings(cik, &submissions.filings.recent, form.as_deref(), limit);

            Ok(ToolOutput {
                summary: format!("Listed {} filings of {}", filings.len(), ticker),
                envelope: ResponseEnvelope::urls(filings.into_iter().map(|f| f.url)),
            })
        }

        "get_filing" => {
            let url = require_arg(&call.arguments, "url")?;
            let section = parse_string_arg(&call.arguments, "section");
            let html = source.document(&url).await?;
            let data = serde_json::json!({
                "url": url,
                "section": section,
            });
            Ok(ToolOutput {
                summary: format!("Opened filing {}", url),
                envelope: ResponseEnvelope::filing(
                    html,
                    data,
                    section.as_deref().and_then(section_anchor),
                ),
            })
        }

        unknown => Err(ToolError::UnknownTool(unknown.to_string())),
    }
}

async fn lookup_cik(source: &dyn FilingSource, ticker: &str) -> Result<Cik, SecError> {
    let index = source.ticker_index().await?;
    index
        .find(ticker)
        .map(|entry| Cik(entry.cik_str))
        .ok_or_else(|| SecError::UnknownTicker(ticker.to_string()))
}

/// Extract a non-blank string argument from the JSON arguments of a tool call
fn parse_string_arg(arguments_json: &str, key: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(arguments_json)
        .ok()
        .and_then(|v| v.get(key).and_then(|v| v.as_str()).map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
}

fn parse_u64_arg(arguments_json: &str, key: &str) -> Option<u64> {
    let args = serde_json::from_str::<serde_json::Value>(arguments_json).ok()?;
    match args.get(key)? {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn require_arg(arguments_json: &str, key: &'static str) -> Result<String, ToolError> {
    parse_string_arg(arguments_json, key).ok_or(ToolError::MissingArgument(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = r#"{"ticker":" AAPL ","form":"","limit":"5"}"#;
        assert_eq!(parse_string_arg(args, "ticker").as_deref(), Some("AAPL"));
        assert_eq!(parse_string_arg(args, "form"), None);
        assert_eq!(parse_u64_arg(args, "limit"), Some(5));
        assert_eq!(parse_u64_arg(r#"{"limit":3}"#, "limit"), Some(3));
        assert_eq!(parse_u64_arg("not json", "limit"), None);
    }

    #[test]
    fn test_definitions_are_unique() {
        let defs = sec_tool_definitions();
        let mut names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), defs.len());
    }
}
