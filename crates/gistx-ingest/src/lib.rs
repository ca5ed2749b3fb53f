//! Workbook ingestion for the GiSTX generator.
//!
//! This crate turns a spreadsheet into an immutable snapshot of worksheets and
//! knows which of them take part in a run.
//!
//! # Features
//!
//! - **Provider contract**: [`WorkbookSource`] yields worksheet names and rows
//! - **Spreadsheet reading**: [`XlsxWorkbook`] loads `.xlsx`/`.xls`/`.ods` files and flags merged rows
//! - **Worksheet selection**: `crfs` plus `*_dd` / `*_xml` questionnaire sheets
//! - **Crfs reader**: positional mapping of the `crfs` sheet into manifest entries
//! - **CSV discovery**: lookup files packaged with the survey
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use gistx_ingest::{WorkbookSource, XlsxWorkbook, questionnaire_worksheets};
//!
//! let book = XlsxWorkbook::open(Path::new("dictionary.xlsx"))?;
//! for name in questionnaire_worksheets(&book.worksheet_names()) {
//!     let sheet = book.worksheet(&name)?;
//!     println!("{name}: {} rows", sheet.rows.len());
//! }
//! ```

mod crfs;
mod discovery;
mod error;
mod selection;
mod workbook;
mod xlsx;

// === Error Types ===
pub use error::{IngestError, Result};

// === Workbook Provider ===
pub use workbook::{MemoryWorkbook, RawRow, WorkbookSource, Worksheet};
pub use xlsx::XlsxWorkbook;

// === Worksheet Selection ===
pub use selection::{WorksheetRole, classify_worksheet, questionnaire_stem, questionnaire_worksheets};

// === Crfs ===
pub use crfs::{CrfsReport, read_crfs};

// === File Discovery ===
pub use discovery::{CsvFolder, list_csv_files, scan_csv_folder};
