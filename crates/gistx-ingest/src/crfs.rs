//! Positional reader for the `crfs` worksheet.

use gistx_model::{CrfsColumn, CrfsEntry, IdConfig, Issue, IssueKind};
use tracing::debug;

use crate::workbook::{RawRow, Worksheet};

/// Entries read from `crfs`, with the problems found on the way.
#[derive(Debug, Clone, Default)]
pub struct CrfsReport {
    pub entries: Vec<CrfsEntry>,
    pub issues: Vec<Issue>,
}

/// Maps every non-blank data row to a [`CrfsEntry`]. The header row is skipped
/// without being checked; columns are read by position.
pub fn read_crfs(sheet: &Worksheet) -> CrfsReport {
    let mut report = CrfsReport::default();
    for row in sheet.data_rows() {
        if row.is_blank() {
            continue;
        }
        let mut reader = RowReader {
            sheet: &sheet.name,
            row,
            issues: &mut report.issues,
        };
        let entry = CrfsEntry {
            display_order: reader.integer(CrfsColumn::DisplayOrder),
            tablename: reader.text(CrfsColumn::Tablename),
            displayname: reader.text(CrfsColumn::Displayname),
            primarykey: reader.text(CrfsColumn::Primarykey),
            idconfig: reader.idconfig(),
            isbase: reader.integer(CrfsColumn::Isbase),
            linkingfield: reader.text(CrfsColumn::Linkingfield),
            parenttable: reader.text(CrfsColumn::Parenttable),
            incrementfield: reader.text(CrfsColumn::Incrementfield),
            requireslink: reader.integer(CrfsColumn::Requireslink),
            repeat_count_field: reader.text(CrfsColumn::RepeatCountField),
            auto_start_repeat: reader.integer(CrfsColumn::AutoStartRepeat),
            repeat_enforce_count: reader.integer(CrfsColumn::RepeatEnforceCount),
            display_fields: reader.text(CrfsColumn::DisplayFields),
            entry_condition: reader.text(CrfsColumn::EntryCondition),
        };
        report.entries.push(entry);
    }
    debug!(
        entries = report.entries.len(),
        issues = report.issues.len(),
        "read crfs worksheet"
    );
    report
}

struct RowReader<'a> {
    sheet: &'a str,
    row: &'a RawRow,
    issues: &'a mut Vec<Issue>,
}

impl RowReader<'_> {
    fn raw(&self, column: CrfsColumn) -> &str {
        self.row.cell_at(column.index()).trim()
    }

    fn text(&self, column: CrfsColumn) -> Option<String> {
        let value = self.raw(column);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn integer(&mut self, column: CrfsColumn) -> Option<i64> {
        debug_assert!(column.is_integer());
        let value = self.raw(column).to_string();
        if value.is_empty() {
            return None;
        }
        match value.parse::<i64>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.report(format!(
                    "{} must be an integer, found '{value}'",
                    column.name()
                ));
                None
            }
        }
    }

    fn idconfig(&mut self) -> Option<IdConfig> {
        let value = self.raw(CrfsColumn::Idconfig).to_string();
        if value.is_empty() {
            return None;
        }
        match serde_json::from_str::<IdConfig>(&value) {
            Ok(config) => Some(config),
            Err(err) => {
                self.report(format!("idconfig is not valid JSON ({err}): {value}"));
                None
            }
        }
    }

    fn report(&mut self, message: String) {
        self.issues.push(
            Issue::error(IssueKind::FieldFormat, self.sheet, message).at_row(self.row.position.row()),
        );
    }
}
