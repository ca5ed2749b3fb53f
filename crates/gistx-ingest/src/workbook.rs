//! Workbook provider contract and the in-memory implementation.

use gistx_model::{Column, Position};

use crate::error::{IngestError, Result};

/// One worksheet row as ordered cell strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub position: Position,
    pub cells: Vec<String>,
    /// True when a merged region covers the row's Comments cell.
    pub merged: bool,
}

impl RawRow {
    pub fn new(row: usize, cells: Vec<String>) -> Self {
        Self {
            position: Position::new(row),
            cells,
            merged: false,
        }
    }

    pub fn merged(mut self) -> Self {
        self.merged = true;
        self
    }

    /// Raw text at a zero-based index; missing cells read as empty.
    pub fn cell_at(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Raw text of a data dictionary column.
    pub fn cell(&self, column: Column) -> &str {
        self.cell_at(column.index())
    }

    /// Trimmed text of a data dictionary column.
    pub fn trimmed(&self, column: Column) -> &str {
        self.cell(column).trim()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.trim().is_empty())
    }
}

/// A named sheet of rows, in worksheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Builds a worksheet from plain string rows; row 1 is the first entry.
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| RawRow::new(idx + 1, cells.into_iter().map(Into::into).collect()))
            .collect();
        Self::new(name, rows)
    }

    pub fn header(&self) -> Option<&RawRow> {
        self.rows.first()
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[RawRow] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Source of worksheets for a run.
///
/// Implementations hold an immutable snapshot; validation never writes back.
pub trait WorkbookSource: Sync {
    /// Worksheet names in workbook order.
    fn worksheet_names(&self) -> Vec<String>;

    /// Rows of one worksheet.
    fn worksheet(&self, name: &str) -> Result<Worksheet>;
}

/// Workbook held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Worksheet>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Self { sheets }
    }

    pub fn push(&mut self, sheet: Worksheet) {
        self.sheets.push(sheet);
    }

    pub fn with_sheet(mut self, sheet: Worksheet) -> Self {
        self.push(sheet);
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn worksheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    fn worksheet(&self, name: &str) -> Result<Worksheet> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .cloned()
            .ok_or_else(|| IngestError::WorksheetNotFound {
                worksheet: name.to_string(),
            })
    }
}
