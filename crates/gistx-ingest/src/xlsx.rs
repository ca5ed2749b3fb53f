//! Spreadsheet-backed workbook (`.xlsx`, `.xlsm`, `.xls`, `.ods`) via calamine.

use std::path::{Path, PathBuf};

use calamine::{Data, Dimensions, Range, Reader, Sheets, open_workbook_auto};
use gistx_model::Column;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::selection::{WorksheetRole, classify_worksheet};
use crate::workbook::{MemoryWorkbook, RawRow, WorkbookSource, Worksheet};

/// Snapshot of the relevant worksheets of a spreadsheet file.
///
/// Only `crfs` and questionnaire worksheets are read; other names are kept so
/// callers can still list them.
#[derive(Debug)]
pub struct XlsxWorkbook {
    path: PathBuf,
    names: Vec<String>,
    sheets: MemoryWorkbook,
}

impl XlsxWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IngestError::WorkbookNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::WorkbookOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let names = workbook.sheet_names().to_owned();

        let merged = merged_regions(&mut workbook);

        let mut sheets = MemoryWorkbook::default();
        for name in &names {
            if classify_worksheet(name) == WorksheetRole::Ignored {
                continue;
            }
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| IngestError::WorksheetRead {
                    worksheet: name.clone(),
                    message: e.to_string(),
                })?;
            let regions: Vec<Dimensions> = merged
                .iter()
                .filter(|(sheet, _)| sheet == name)
                .map(|(_, dims)| *dims)
                .collect();
            let sheet = worksheet_from_range(name, &range, &regions);
            debug!(worksheet = %name, rows = sheet.rows.len(), "loaded worksheet");
            sheets.push(sheet);
        }

        Ok(Self {
            path: path.to_path_buf(),
            names,
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn worksheet_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn worksheet(&self, name: &str) -> Result<Worksheet> {
        self.sheets.worksheet(name)
    }
}

/// Merged regions per worksheet. Only the xlsx reader exposes them; other
/// formats report none.
fn merged_regions<RS>(workbook: &mut Sheets<RS>) -> Vec<(String, Dimensions)>
where
    RS: std::io::Read + std::io::Seek,
{
    let Sheets::Xlsx(xlsx) = workbook else {
        return Vec::new();
    };
    if let Err(err) = xlsx.load_merged_regions() {
        debug!(error = %err, "merged regions unavailable");
        return Vec::new();
    }
    let names = xlsx.sheet_names().to_owned();
    names
        .iter()
        .flat_map(|name| {
            xlsx.merged_regions_by_sheet(name)
                .into_iter()
                .map(|(_, _, dims)| (name.clone(), *dims))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn worksheet_from_range(name: &str, range: &Range<Data>, merged: &[Dimensions]) -> Worksheet {
    let Some((end_row, end_col)) = range.end() else {
        return Worksheet::new(name, Vec::new());
    };
    let comments_col = Column::Comments.index() as u32;

    let rows = (0..=end_row)
        .map(|row| {
            let cells = (0..=end_col)
                .map(|col| range.get_value((row, col)).map(cell_text).unwrap_or_default())
                .collect();
            let raw = RawRow::new(row as usize + 1, cells);
            if merged.iter().any(|dims| covers(dims, row, comments_col)) {
                raw.merged()
            } else {
                raw
            }
        })
        .collect();
    Worksheet::new(name, rows)
}

fn covers(dims: &Dimensions, row: u32, col: u32) -> bool {
    dims.start.0 <= row && row <= dims.end.0 && dims.start.1 <= col && col <= dims.end.1
}

/// Renders a cell the way it reads in the sheet: whole floats lose their
/// fractional part and booleans become `True` / `False`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => format!("{f}"),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_render_as_integers() {
        assert_eq!(cell_text(&Data::Float(200.0)), "200");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Float(-3.0)), "-3");
        assert_eq!(cell_text(&Data::Int(7)), "7");
    }

    #[test]
    fn booleans_render_capitalised() {
        assert_eq!(cell_text(&Data::Bool(true)), "True");
        assert_eq!(cell_text(&Data::Bool(false)), "False");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn range_rows_keep_absolute_positions() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 13));
        range.set_value((0, 0), Data::String("FieldName".into()));
        range.set_value((2, 0), Data::String("age".into()));
        range.set_value((2, 4), Data::Float(3.0));

        let merged = [Dimensions {
            start: (1, 0),
            end: (1, 13),
        }];
        let sheet = worksheet_from_range("people_dd", &range, &merged);

        assert_eq!(sheet.rows.len(), 3);
        assert!(sheet.rows[1].merged);
        assert!(!sheet.rows[2].merged);
        assert_eq!(sheet.rows[2].position.row(), 3);
        assert_eq!(sheet.rows[2].cell(Column::FieldName), "age");
        assert_eq!(sheet.rows[2].cell(Column::MaxCharacters), "3");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = XlsxWorkbook::open(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(matches!(err, IngestError::WorkbookNotFound { .. }));
    }
}
