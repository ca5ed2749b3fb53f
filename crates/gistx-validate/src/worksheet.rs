//! Worksheet validator: every row, then the cross-row passes.

use std::time::Instant;

use gistx_ingest::Worksheet;
use gistx_model::{Issue, Question, Severity};
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use crate::checks::{self, FieldEntry, FieldIndex};
use crate::row::{is_structural, validate_row};
use crate::schema::check_header;

/// One check performed on a worksheet and what it found.
#[derive(Debug, Clone)]
pub struct CheckRecord {
    pub label: String,
    pub issues: Vec<Issue>,
}

impl CheckRecord {
    fn new(label: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            label: label.into(),
            issues,
        }
    }

    pub fn passed(&self) -> bool {
        !self.issues.iter().any(Issue::is_error)
    }
}

/// Result of validating one worksheet.
///
/// The worksheet succeeds only when no check reported an error; `questions`
/// is then the full ordered question list.
#[derive(Debug, Clone)]
pub struct WorksheetReport {
    pub worksheet: String,
    pub questions: Vec<Question>,
    pub checks: Vec<CheckRecord>,
}

impl WorksheetReport {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.checks.iter().flat_map(|check| check.issues.iter())
    }

    pub fn error_count(&self) -> usize {
        self.issues().filter(|issue| issue.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Validated questions, or `None` when any check failed.
    pub fn questions(&self) -> Option<&[Question]> {
        (!self.has_errors()).then_some(self.questions.as_slice())
    }
}

pub fn validate_worksheet(worksheet: &Worksheet) -> WorksheetReport {
    let span = info_span!("worksheet", name = %worksheet.name);
    let _guard = span.enter();
    let start = Instant::now();
    let name = worksheet.name.as_str();

    let mut report = WorksheetReport {
        worksheet: worksheet.name.clone(),
        questions: Vec::new(),
        checks: Vec::new(),
    };

    let header_issues = check_header(name, worksheet.header());
    let header_ok = header_issues.is_empty();
    report.checks.push(CheckRecord::new("header", header_issues));
    if !header_ok {
        warn!("header mismatch; rows not validated");
        return report;
    }

    let rows: Vec<_> = worksheet
        .data_rows()
        .iter()
        .filter(|row| !is_structural(row))
        .collect();

    for row in &rows {
        let row_report = validate_row(name, row);
        report.checks.push(CheckRecord::new(
            format!("row {} ({})", row_report.position, row_report.field_name),
            row_report.issues,
        ));
        if let Some(question) = row_report.question {
            report.questions.push(question);
        }
    }

    let index = FieldIndex::new(rows.iter().map(|row| FieldEntry::from_row(row)).collect());
    let passes = [
        (
            "logic check references",
            checks::logic_refs::check(name, &report.questions, &index),
        ),
        (
            "skip references",
            checks::skip_refs::check(name, &report.questions, &index),
        ),
        ("duplicate FieldNames", checks::duplicates::check(name, &index)),
        (
            "required MaxCharacters",
            checks::max_characters::check(name, &report.questions),
        ),
    ];
    for (label, issues) in passes {
        report.checks.push(CheckRecord::new(label, issues));
    }

    for issue in report.issues().filter(|issue| issue.is_error()) {
        warn!(%issue, "validation issue");
    }
    info!(
        rows = rows.len(),
        questions = report.questions.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "worksheet validated"
    );
    report
}

/// Validates worksheets in parallel; reports come back in input order.
pub fn validate_worksheets(worksheets: &[Worksheet]) -> Vec<WorksheetReport> {
    worksheets.par_iter().map(validate_worksheet).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gistx_model::Column;

    fn sheet(name: &str, rows: &[&[&str]]) -> Worksheet {
        let header: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        let mut all: Vec<Vec<&str>> = vec![header];
        all.extend(rows.iter().map(|r| r.to_vec()));
        Worksheet::from_rows(name, all)
    }

    #[test]
    fn records_every_check() {
        let ws = sheet(
            "visit_dd",
            &[
                &["age", "text", "integer", "Age?"],
                &["", "", "", "Section B"],
                &["sex", "radio", "integer", "Sex?", "", "1:Male\n2:Female"],
            ],
        );
        let report = validate_worksheet(&ws);
        let labels: Vec<_> = report.checks.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "header",
                "row 2 (age)",
                "row 4 (sex)",
                "logic check references",
                "skip references",
                "duplicate FieldNames",
                "required MaxCharacters",
            ]
        );
        assert!(!report.has_errors());
        assert_eq!(report.questions().map(<[_]>::len), Some(2));
    }

    #[test]
    fn header_failure_stops() {
        let mut names: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        names[0] = "Field";
        let ws = Worksheet::from_rows("x_dd", vec![names, vec!["age", "text"]]);
        let report = validate_worksheet(&ws);
        assert_eq!(report.checks.len(), 1);
        assert!(report.has_errors());
        assert!(report.questions().is_none());
    }

    #[test]
    fn parallel_reports_keep_order() {
        let sheets: Vec<_> = (0..8)
            .map(|i| sheet(&format!("s{i}_dd"), &[&["age", "text", "integer", "Age?"]]))
            .collect();
        let reports = validate_worksheets(&sheets);
        let names: Vec<_> = reports.iter().map(|r| r.worksheet.clone()).collect();
        let expected: Vec<_> = (0..8).map(|i| format!("s{i}_dd")).collect();
        assert_eq!(names, expected);
    }
}
