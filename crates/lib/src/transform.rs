//! # Completion Transformation
//!
//! Turns the raw text of one model completion into FAQ rows. Parsing the
//! model's table layout is kept behind [`CompletionParser`] so the expected
//! output format can change without touching the deduplication rules or the
//! generation loop.

use crate::types::{FaqRow, FaqTable, SeenQuestions};
use thiserror::Error;
use tracing::{debug, warn};

/// A table line that could not be read as a four-column FAQ row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed FAQ row (expected 4 fields, found {fields}): {line}")]
pub struct MalformedRow {
    pub line: String,
    pub fields: usize,
}

/// The four raw cells of a parsed table row, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub question: String,
    pub answer: String,
    pub source: String,
    pub keyword: String,
}

/// Extracts candidate FAQ rows from a model completion.
pub trait CompletionParser: Send + Sync {
    /// Returns one entry per data line found in `raw`, in order.
    /// Non-table lines, header rows and separators produce no entry.
    fn parse(&self, raw: &str) -> Vec<Result<ParsedRow, MalformedRow>>;
}

/// Parses pipe-delimited markdown tables such as
/// `| question | answer | source | keyword |`.
#[derive(Debug, Clone)]
pub struct MarkdownTableParser {
    delimiter: char,
    header_markers: Vec<String>,
}

impl Default for MarkdownTableParser {
    fn default() -> Self {
        Self {
            delimiter: '|',
            header_markers: vec![
                "FAQ".to_string(),
                "Question".to_string(),
                "Questions".to_string(),
            ],
        }
    }
}

impl MarkdownTableParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replaces the first-cell values that identify a header row.
    /// Matching ignores case and markdown emphasis (`**FAQ**` matches `FAQ`).
    pub fn with_header_markers(mut self, markers: Vec<String>) -> Self {
        self.header_markers = markers;
        self
    }

    fn is_header(&self, first_cell: &str) -> bool {
        let cell = first_cell.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace());
        self.header_markers
            .iter()
            .any(|marker| cell.eq_ignore_ascii_case(marker))
    }

    /// A `|---|:---:|` line. At least one cell must hold a dash, so an
    /// all-blank row is reported as malformed instead.
    fn is_separator(cells: &[&str]) -> bool {
        cells.iter().any(|cell| cell.contains('-'))
            && cells
                .iter()
                .all(|cell| cell.chars().all(|c| c == '-' || c == ':' || c.is_whitespace()))
    }
}

impl CompletionParser for MarkdownTableParser {
    fn parse(&self, raw: &str) -> Vec<Result<ParsedRow, MalformedRow>> {
        let mut rows = Vec::new();
        for line in raw.lines() {
            let line = line.trim_end();
            if !line.starts_with(self.delimiter) {
                continue;
            }

            let inner = line.trim_matches(self.delimiter);
            let cells: Vec<&str> = inner.split(self.delimiter).map(str::trim).collect();

            if cells.first().is_some_and(|first| self.is_header(first)) {
                continue;
            }
            if Self::is_separator(&cells) {
                continue;
            }

            if cells.len() < 4 || cells[0].is_empty() {
                rows.push(Err(MalformedRow {
                    line: line.to_string(),
                    fields: cells.len(),
                }));
                continue;
            }
            if cells.len() > 4 {
                debug!("Ignoring {} extra cell(s) in row: {line}", cells.len() - 4);
            }

            rows.push(Ok(ParsedRow {
                question: cells[0].to_string(),
                answer: cells[1].to_string(),
                source: cells[2].to_string(),
                keyword: cells[3].to_string(),
            }));
        }
        rows
    }
}

/// Appends `" {disease}"` to `keyword` unless it already mentions the disease.
pub fn tag_keyword(keyword: &str, disease: &str) -> String {
    if keyword.to_lowercase().contains(&disease.to_lowercase()) {
        keyword.to_string()
    } else {
        format!("{keyword} {disease}")
    }
}

/// Transforms one completion into the rows not seen earlier in the session.
///
/// `seen` is updated with every question emitted. Malformed lines are logged
/// and skipped.
pub fn transform(
    raw: &str,
    disease: &str,
    seen: &mut SeenQuestions,
    parser: &dyn CompletionParser,
) -> FaqTable {
    let mut table = FaqTable::new();
    let mut duplicates = 0usize;

    for parsed in parser.parse(raw) {
        let row = match parsed {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping line: {e}");
                continue;
            }
        };

        if !seen.insert(&row.question) {
            duplicates += 1;
            continue;
        }

        table.push(FaqRow {
            keyword: tag_keyword(&row.keyword, disease),
            question: row.question,
            answer: row.answer,
            source: row.source,
        });
    }

    if duplicates > 0 {
        debug!("Discarded {duplicates} previously seen question(s) for '{disease}'.");
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_keyword() {
        assert_eq!(tag_keyword("virus", "flu"), "virus flu");
        assert_eq!(tag_keyword("Flu shot", "flu"), "Flu shot");
        assert_eq!(tag_keyword("", "asthma"), " asthma");
    }

    #[test]
    fn test_parser_skips_header_and_separator() {
        let raw = "\
| **FAQ** | **Answer** | **Source** | **Keyword** |
|---------|:----------:|--------|---------|
| What is flu? | A virus | CDC | virus |";
        let rows = MarkdownTableParser::new().parse(raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap().question, "What is flu?");
    }

    #[test]
    fn test_parser_reports_short_rows() {
        let rows = MarkdownTableParser::new().parse("| only | three | cells |");
        assert_eq!(
            rows,
            vec![Err(MalformedRow {
                line: "| only | three | cells |".to_string(),
                fields: 3,
            })]
        );
    }

    #[test]
    fn test_blank_row_is_malformed_not_separator() {
        let rows = MarkdownTableParser::new().parse("|  |  |  |  |");
        assert_eq!(
            rows,
            vec![Err(MalformedRow {
                line: "|  |  |  |  |".to_string(),
                fields: 4,
            })]
        );
        assert!(MarkdownTableParser::new().parse("| :-- | --- | :-: | --: |").is_empty());
    }

    #[test]
    fn test_parser_ignores_prose() {
        let raw = "Here are your FAQs:\n\n1. not a table line\n";
        assert!(MarkdownTableParser::new().parse(raw).is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = MarkdownTableParser::new().with_delimiter(';');
        let rows = parser.parse("; Q ; A ; S ; K ;");
        assert_eq!(rows[0].as_ref().unwrap().keyword, "K");
    }
}
