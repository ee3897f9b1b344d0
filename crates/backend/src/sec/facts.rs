//! XBRL company facts to table artifacts, and label ranking for concept searches

use super::types::{CompanyFacts, Concept};
use contracts::chat::{TableArtifact, TableRow};
use serde_json::Value;
use similar::TextDiff;

/// Minimum label similarity for a table to count as a match
pub const MATCH_CUTOFF: f64 = 0.6;

/// One table per concept and unit. Concepts without a label are skipped.
pub fn concept_tables(facts: &CompanyFacts) -> Vec<TableArtifact> {
    let cik = match &facts.cik {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    let mut tables = Vec::new();
    for (category, concepts) in &facts.facts {
        let Some(concepts) = concepts.as_object() else {
            continue;
        };
        for (name, raw) in concepts {
            let concept: Concept = match serde_json::from_value(raw.clone()) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("Skipping malformed concept {}/{}: {}", category, name, e);
                    continue;
                }
            };
            let Some(label) = concept.label.clone() else {
                continue;
            };
            for (unit, rows) in &concept.units {
                let rows = rows
                    .as_array()
                    .map(|rows| rows.iter().filter_map(|r| r.as_object().cloned()).collect())
                    .unwrap_or_default();

                let mut table = TableArtifact::new(name.clone(), complete_rows(rows));
                table.cik = Some(cik.clone()).filter(|c| !c.is_empty());
                table.category = Some(category.clone());
                table.label = Some(label.clone());
                table.description = concept.description.clone();
                table.unit = Some(unit.clone());
                tables.push(table);
            }
        }
    }
    tables
}

/// Give every row every key seen in the table, in first-seen order, so the
/// first row defines all columns
fn complete_rows(rows: Vec<TableRow>) -> Vec<TableRow> {
    let mut keys: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    rows.into_iter()
        .map(|row| {
            keys.iter()
                .map(|k| (k.clone(), row.get(k).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect()
}

/// Tables whose label resembles `search_term`, best first, at most `max_tables`
pub fn rank_tables(
    tables: Vec<TableArtifact>,
    search_term: &str,
    max_tables: usize,
) -> Vec<TableArtifact> {
    let term = search_term.trim().to_lowercase();
    let mut scored: Vec<(f64, TableArtifact)> = tables
        .into_iter()
        .filter_map(|table| {
            let label = table.label.as_deref().unwrap_or(&table.fact).to_lowercase();
            let score = label_score(&term, &label);
            (score >= MATCH_CUTOFF).then_some((score, table))
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(max_tables)
        .map(|(_, table)| table)
        .collect()
}

/// Character similarity, lifted to the cutoff when the label contains the term
fn label_score(term: &str, label: &str) -> f64 {
    let ratio = similarity(term, label);
    if !term.is_empty() && label.contains(term) {
        ratio.max(MATCH_CUTOFF)
    } else {
        ratio
    }
}

/// Matched characters over total length, in [0, 1]
pub fn similarity(a: &str, b: &str) -> f64 {
    TextDiff::from_chars(a, b).ratio() as f64
}
