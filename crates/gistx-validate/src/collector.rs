//! Issue accumulation for one row.

use gistx_model::{Column, Issue, IssueKind, Position, Severity};

/// Collects issues for a single row so every column can be checked in one
/// pass. Location details are stamped on each issue as it is recorded.
#[derive(Debug)]
pub struct IssueSink<'a> {
    worksheet: &'a str,
    row: Position,
    field: Option<&'a str>,
    issues: Vec<Issue>,
}

impl<'a> IssueSink<'a> {
    pub fn new(worksheet: &'a str, row: Position) -> Self {
        Self {
            worksheet,
            row,
            field: None,
            issues: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: &'a str) -> Self {
        if !field.is_empty() {
            self.field = Some(field);
        }
        self
    }

    pub fn error(&mut self, kind: IssueKind, column: Column, message: impl Into<String>) {
        self.record(kind, Severity::Error, column, message.into());
    }

    pub fn warning(&mut self, kind: IssueKind, column: Column, message: impl Into<String>) {
        self.record(kind, Severity::Warning, column, message.into());
    }

    fn record(&mut self, kind: IssueKind, severity: Severity, column: Column, message: String) {
        let mut issue = Issue::new(kind, severity, self.worksheet, message)
            .at_row(self.row.row())
            .in_column(column);
        if let Some(field) = self.field {
            issue = issue.for_field(field);
        }
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

/// Marks the error count when a parser starts so it can tell whether it
/// added any errors of its own.
pub(crate) struct Checkpoint(usize);

impl Checkpoint {
    pub(crate) fn new(sink: &IssueSink<'_>) -> Self {
        Self(sink.error_count())
    }

    pub(crate) fn clean(&self, sink: &IssueSink<'_>) -> bool {
        sink.error_count() == self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_location() {
        let mut sink = IssueSink::new("visit_dd", Position::new(7)).with_field("weight");
        sink.error(IssueKind::FieldFormat, Column::LowerRange, "not a number");
        sink.warning(IssueKind::FieldFormat, Column::Responses, "ignored");
        assert_eq!(sink.error_count(), 1);

        let issues = sink.into_issues();
        assert_eq!(issues[0].row, Some(7));
        assert_eq!(issues[0].column, Some(Column::LowerRange));
        assert_eq!(issues[0].field.as_deref(), Some("weight"));
        assert_eq!(issues[1].severity, Severity::Warning);
    }

    #[test]
    fn checkpoint_ignores_warnings() {
        let mut sink = IssueSink::new("visit_dd", Position::new(2));
        let mark = Checkpoint::new(&sink);
        sink.warning(IssueKind::FieldFormat, Column::Responses, "unused key");
        assert!(mark.clean(&sink));
        sink.error(IssueKind::FieldFormat, Column::Responses, "bad");
        assert!(!mark.clean(&sink));
    }
}
