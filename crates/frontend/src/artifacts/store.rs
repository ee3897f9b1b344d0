//! Append-only store of every table artifact received in this page session.

use contracts::chat::TableArtifact;

#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    tables: Vec<TableArtifact>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch in order. Duplicate labels are kept.
    pub fn add(&mut self, batch: impl IntoIterator<Item = TableArtifact>) {
        self.tables.extend(batch);
    }

    pub fn all(&self) -> &[TableArtifact] {
        &self.tables
    }

    /// First table with this label, in insertion order
    pub fn find_by_label(&self, label: &str) -> Option<&TableArtifact> {
        self.tables.iter().find(|t| t.fact == label)
    }

    /// Store positions of the tables whose label contains `query`,
    /// case-insensitive, in insertion order. An empty query matches everything.
    pub fn filter_indices(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        self.tables
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fact.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&TableArtifact> {
        self.tables.get(index)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
