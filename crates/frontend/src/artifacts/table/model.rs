//! Table artifact: grid, metadata and CSV derived from one `TableArtifact`.

use contracts::chat::{cell_text, TableArtifact};

/// Display grid. Columns are fixed by the first row: cells missing from
/// later rows are empty, extra keys are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn from_artifact(artifact: &TableArtifact) -> Self {
        let columns = artifact.columns();
        let rows = artifact
            .table
            .iter()
            .map(|row| columns.iter().map(|c| cell_text(row.get(c))).collect())
            .collect();
        Self { columns, rows }
    }

    /// No rows: the renderer shows a placeholder instead of the grid
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Metadata panel lines. The fact is always listed, optional fields only when set.
pub fn metadata_entries(artifact: &TableArtifact) -> Vec<(&'static str, String)> {
    let mut entries = vec![("Fact", artifact.fact.clone())];
    let optional = [
        ("CIK", &artifact.cik),
        ("Category", &artifact.category),
        ("Label", &artifact.label),
        ("Description", &artifact.description),
        ("Unit", &artifact.unit),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_ref().filter(|v| !v.trim().is_empty()) {
            entries.push((name, value.clone()));
        }
    }
    entries
}

/// CSV export of one table: header from the first row, one line per row.
///
/// Values are joined with `,` as-is. Embedded commas, quotes and newlines are
/// not escaped; downstream consumers rely on this exact format.
pub fn to_csv(artifact: &TableArtifact) -> String {
    let grid = TableGrid::from_artifact(artifact);
    if grid.columns.is_empty() {
        return String::new();
    }

    let mut csv = String::new();
    csv.push_str(&grid.columns.join(","));
    csv.push('\n');
    for row in &grid.rows {
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// `<fact>.csv`, with path separators replaced
pub fn csv_file_name(artifact: &TableArtifact) -> String {
    let stem: String = artifact
        .fact
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stem = if stem.trim().is_empty() { "table" } else { stem.as_str() };
    format!("{}.csv", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact(value: serde_json::Value) -> TableArtifact {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_grid_and_csv_for_simple_table() {
        let table = artifact(json!({"fact": "F1", "table": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]}));
        let grid = TableGrid::from_artifact(&table);

        assert_eq!(grid.columns, vec!["x", "y"]);
        assert_eq!(grid.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
        assert_eq!(to_csv(&table), "x,y\n1,2\n3,4\n");
    }

    #[test]
    fn test_column_set_is_fixed_by_first_row() {
        let table = artifact(json!({
            "fact": "F2",
            "table": [{"a": "1", "b": "2"}, {"a": "3", "c": "extra"}, {"b": null}]
        }));
        let grid = TableGrid::from_artifact(&table);

        assert_eq!(grid.columns, vec!["a", "b"]);
        assert_eq!(grid.rows, vec![vec!["1", "2"], vec!["3", ""], vec!["", ""]]);
        assert_eq!(to_csv(&table), "a,b\n1,2\n3,\n,\n");
    }

    #[test]
    fn test_render_is_idempotent() {
        let table = artifact(json!({"fact": "F1", "table": [{"x": 1.5, "y": "z"}]}));
        assert_eq!(TableGrid::from_artifact(&table), TableGrid::from_artifact(&table));
    }

    #[test]
    fn test_empty_table() {
        let table = TableArtifact::new("Nothing", vec![]);
        assert!(TableGrid::from_artifact(&table).is_empty());
        assert_eq!(to_csv(&table), "");
    }

    #[test]
    fn test_csv_does_not_escape_delimiters() {
        let table = artifact(json!({"fact": "F", "table": [{"name": "Apple, Inc."}]}));
        assert_eq!(to_csv(&table), "name\nApple, Inc.\n");
    }

    #[test]
    fn test_metadata_lists_only_present_fields() {
        let table = artifact(json!({
            "fact": "Revenues",
            "cik": "320193",
            "label": "Revenues",
            "description": "  ",
            "unit": "USD"
        }));
        assert_eq!(
            metadata_entries(&table),
            vec![
                ("Fact", "Revenues".to_string()),
                ("CIK", "320193".to_string()),
                ("Label", "Revenues".to_string()),
                ("Unit", "USD".to_string()),
            ]
        );
    }

    #[test]
    fn test_csv_file_name() {
        assert_eq!(csv_file_name(&TableArtifact::new("Revenues", vec![])), "Revenues.csv");
        assert_eq!(csv_file_name(&TableArtifact::new("a/b", vec![])), "a_b.csv");
        assert_eq!(csv_file_name(&TableArtifact::new(" ", vec![])), "table.csv");
    }
}
