//! Data dictionary validation.
//!
//! A questionnaire worksheet is checked in two stages:
//!
//! - **Rows**: each question row is validated column by column and its cells
//!   are parsed into typed specs ([`row::validate_row`]).
//! - **Cross-row passes**: LogicCheck and Skip references, duplicate
//!   FieldNames and required MaxCharacters ([`checks`]).
//!
//! Problems are collected as [`gistx_model::Issue`] values; nothing here
//! returns early on the first error.

mod collector;
mod grammar;

pub mod checks;
pub mod parsers;
pub mod row;
pub mod schema;
pub mod worksheet;

pub use collector::IssueSink;
pub use grammar::{FIELD_NAME_REGEX, cell_lines, is_field_name};
pub use row::{RowReport, is_structural, validate_row};
pub use schema::check_header;
pub use worksheet::{CheckRecord, WorksheetReport, validate_worksheet, validate_worksheets};
