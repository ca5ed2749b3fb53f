//! Whole-worksheet passes that need every row's position.
//!
//! Each pass exposes `check(...) -> Vec<Issue>` and is run after the row
//! validator has seen every row.

pub mod duplicates;
pub mod logic_refs;
pub mod max_characters;
pub mod skip_refs;

use std::collections::BTreeMap;

use gistx_ingest::RawRow;
use gistx_model::{Column, Position, QuestionType};

/// One non-structural row as seen by the cross-row passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub position: Position,
    pub field_name: String,
    /// `None` when the QuestionType cell did not parse.
    pub question_type: Option<QuestionType>,
}

impl FieldEntry {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            position: row.position,
            field_name: row.trimmed(Column::FieldName).to_string(),
            question_type: row.trimmed(Column::QuestionType).parse().ok(),
        }
    }
}

/// FieldName lookup over every question row, including rows that failed
/// validation, so references to a broken row still resolve.
#[derive(Debug, Default)]
pub struct FieldIndex {
    entries: Vec<FieldEntry>,
    first: BTreeMap<String, usize>,
}

impl FieldIndex {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        let mut first = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            first.entry(entry.field_name.clone()).or_insert(idx);
        }
        Self { entries, first }
    }

    /// First row carrying `field_name`.
    pub fn get(&self, field_name: &str) -> Option<&FieldEntry> {
        self.first.get(field_name).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
