//! # Core Types
//!
//! The tabular records produced by a generation session and the ledger used
//! to deduplicate questions within it.

use crate::errors::FaqError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single generated FAQ entry.
///
/// The serde renames define the CSV column names of the published artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRow {
    #[serde(rename = "FAQ")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Keyword")]
    pub keyword: String,
}

impl FaqRow {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        source: impl Into<String>,
        keyword: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            source: source.into(),
            keyword: keyword.into(),
        }
    }
}

/// The CSV header written for every published table.
pub const CSV_HEADERS: [&str; 4] = ["FAQ", "Answer", "Source", "Keyword"];

/// An ordered collection of FAQ rows. Insertion order is generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqTable {
    rows: Vec<FaqRow>,
}

impl FaqTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FaqRow] {
        &self.rows
    }

    pub fn push(&mut self, row: FaqRow) {
        self.rows.push(row);
    }

    /// Appends all rows of `other`, keeping their order.
    pub fn extend(&mut self, other: FaqTable) {
        self.rows.extend(other.rows);
    }

    /// Keeps only the first `len` rows.
    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }

    /// Serializes the table to CSV text with a `FAQ,Answer,Source,Keyword` header.
    pub fn to_csv(&self) -> Result<String, FaqError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        // Written explicitly so an empty table still carries the header row.
        writer.write_record(CSV_HEADERS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| FaqError::Csv(e.into_error().into()))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Parses CSV text produced by [`FaqTable::to_csv`].
    pub fn from_csv(data: &str) -> Result<Self, FaqError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data.as_bytes());
        let rows = reader
            .deserialize::<FaqRow>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }
}

impl From<Vec<FaqRow>> for FaqTable {
    fn from(rows: Vec<FaqRow>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for FaqTable {
    type Item = FaqRow;
    type IntoIter = std::vec::IntoIter<FaqRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// The deduplication ledger for one generation session.
///
/// Append-only. Keeps insertion order so the most recent questions can be
/// fed back to the model as continuation context.
#[derive(Debug, Clone, Default)]
pub struct SeenQuestions {
    order: Vec<String>,
    index: HashSet<String>,
}

impl SeenQuestions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, question: &str) -> bool {
        self.index.contains(question)
    }

    /// Records `question`. Returns `false` if it was already present.
    pub fn insert(&mut self, question: &str) -> bool {
        if !self.index.insert(question.to_string()) {
            return false;
        }
        self.order.push(question.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The last `n` questions in insertion order, or nothing if fewer than `n` exist.
    pub fn last_n(&self, n: usize) -> &[String] {
        if self.order.len() < n {
            return &[];
        }
        &self.order[self.order.len() - n..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_n_requires_enough_entries() {
        let mut seen = SeenQuestions::new();
        assert!(seen.last_n(2).is_empty());
        seen.insert("a");
        assert!(seen.last_n(2).is_empty());
        seen.insert("b");
        seen.insert("c");
        assert_eq!(seen.last_n(2), ["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_insert_is_exact_match() {
        let mut seen = SeenQuestions::new();
        assert!(seen.insert("What is flu?"));
        assert!(!seen.insert("What is flu?"));
        assert!(seen.insert("what is flu?"));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_csv_round_trip_with_quoting() {
        let table = FaqTable::from(vec![
            FaqRow::new("Is it \"contagious\"?", "Yes, very", "CDC", "spread flu"),
            FaqRow::new("Line\nbreak?", "a|b", "WHO", "flu"),
        ]);
        let csv = table.to_csv().unwrap();
        assert!(csv.starts_with("FAQ,Answer,Source,Keyword\n"));
        assert_eq!(FaqTable::from_csv(&csv).unwrap(), table);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let csv = FaqTable::new().to_csv().unwrap();
        assert_eq!(csv, "FAQ,Answer,Source,Keyword\n");
    }
}
