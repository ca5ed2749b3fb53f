//! Validation issues. Collected as values, never raised as errors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the worksheet.
    Error,
    /// Reported only.
    Warning,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        }
    }
}

/// What kind of rule an issue breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// Missing or misnamed header.
    Schema,
    /// Per-column syntax or value violation.
    FieldFormat,
    /// QuestionType / FieldType mismatch.
    Compatibility,
    /// Logic or skip field ordering / existence violation.
    Reference,
    /// FieldName or response value collision.
    Duplicate,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Schema => "SchemaError",
            Self::FieldFormat => "FieldFormatError",
            Self::Compatibility => "CompatibilityError",
            Self::Reference => "ReferenceError",
            Self::Duplicate => "DuplicateError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub worksheet: String,
    /// 1-based worksheet row, when the issue belongs to one row.
    pub row: Option<usize>,
    pub column: Option<Column>,
    pub field: Option<String>,
    pub message: String,
}

impl Issue {
    pub fn error(kind: IssueKind, worksheet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, worksheet, message)
    }

    pub fn warning(
        kind: IssueKind,
        worksheet: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(kind, Severity::Warning, worksheet, message)
    }

    pub fn new(
        kind: IssueKind,
        severity: Severity,
        worksheet: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            worksheet: worksheet.into(),
            row: None,
            column: None,
            field: None,
            message: message.into(),
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn in_column(mut self, column: Column) -> Self {
        self.column = Some(column);
        self
    }

    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: worksheet '{}'",
            self.severity.label(),
            self.kind.label(),
            self.worksheet
        )?;
        if let Some(row) = self.row {
            write!(f, ", row {row}")?;
        }
        if let Some(column) = self.column {
            write!(f, ", column {column}")?;
        }
        if let Some(field) = &self.field {
            write!(f, ", FieldName '{field}'")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Counts errors and warnings across a slice of issues.
pub fn count_by_severity(issues: &[Issue]) -> (usize, usize) {
    issues.iter().fold((0, 0), |(errors, warnings), issue| match issue.severity {
        Severity::Error => (errors + 1, warnings),
        Severity::Warning => (errors, warnings + 1),
    })
}
