use std::sync::Arc;

use crate::entry::WordEntry;
use crate::error::QueryError;
use crate::normalize::Normalizer;

/// A normalized, non-empty search needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    needle: String,
}

impl Query {
    /// Returns `None` when the input is blank after trimming and normalization.
    pub fn parse(raw: &str, normalizer: &dyn Normalizer) -> Option<Self> {
        let trimmed = raw.trim();
        let needle = normalizer.normalize(trimmed);
        if needle.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_string(),
            needle,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }
}

/// Read-only source of word pairs.
///
/// Rows come back in the provider's natural order; `page` may return fewer
/// than `limit` rows at the end of the data.
pub trait DatasetProvider {
    fn count(&self) -> Result<usize, QueryError>;

    fn page(&self, offset: usize, limit: usize) -> Result<Vec<WordEntry>, QueryError>;

    /// First `limit` rows whose term or translation contains the needle.
    fn search(&self, query: &Query, limit: usize) -> Result<Vec<WordEntry>, QueryError>;

    fn search_count(&self, query: &Query) -> Result<usize, QueryError>;
}

/// The whole word list held in memory with pre-normalized search keys.
pub struct MemoryDataset {
    rows: Vec<WordEntry>,
    keys: Vec<(String, String)>,
}

impl MemoryDataset {
    pub fn new(rows: Vec<WordEntry>, normalizer: Arc<dyn Normalizer>) -> Self {
        let keys = rows
            .iter()
            .map(|r| (normalizer.normalize(&r.term), normalizer.normalize(&r.translation)))
            .collect();
        Self { rows, keys }
    }

    fn matches<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = &'a WordEntry> + 'a {
        let needle = query.needle();
        self.rows
            .iter()
            .zip(self.keys.iter())
            .filter(move |(_, (term, translation))| {
                term.contains(needle) || translation.contains(needle)
            })
            .map(|(row, _)| row)
    }
}

impl DatasetProvider for MemoryDataset {
    fn count(&self) -> Result<usize, QueryError> {
        Ok(self.rows.len())
    }

    fn page(&self, offset: usize, limit: usize) -> Result<Vec<WordEntry>, QueryError> {
        Ok(self.rows.iter().skip(offset).take(limit).cloned().collect())
    }

    fn search(&self, query: &Query, limit: usize) -> Result<Vec<WordEntry>, QueryError> {
        Ok(self.matches(query).take(limit).cloned().collect())
    }

    fn search_count(&self, query: &Query) -> Result<usize, QueryError> {
        Ok(self.matches(query).count())
    }
}
