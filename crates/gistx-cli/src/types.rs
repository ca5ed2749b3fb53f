use std::path::PathBuf;

use gistx_ingest::CrfsReport;
use gistx_model::{Issue, Severity};
use gistx_output::PackageReport;
use gistx_validate::WorksheetReport;

/// Everything validation learned about a workbook.
#[derive(Debug, Clone, Default)]
pub struct WorkbookValidation {
    /// Questionnaire worksheets in workbook order.
    pub worksheets: Vec<WorksheetReport>,
    /// Present when the workbook has a `crfs` worksheet.
    pub crfs: Option<CrfsReport>,
}

impl WorkbookValidation {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.worksheets
            .iter()
            .flat_map(WorksheetReport::issues)
            .chain(self.crfs.iter().flat_map(|crfs| crfs.issues.iter()))
    }

    pub fn error_count(&self) -> usize {
        self.issues().filter(|issue| issue.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    /// Generation is all-or-nothing: one error anywhere blocks every artifact.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn question_count(&self) -> usize {
        self.worksheets
            .iter()
            .map(|report| report.questions.len())
            .sum()
    }
}

/// Files produced by a successful generation.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub xml_files: Vec<PathBuf>,
    pub manifest: PathBuf,
    pub package: PackageReport,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub workbook: PathBuf,
    pub validation: WorkbookValidation,
    /// `None` when validation errors blocked generation or for check-only runs.
    pub artifacts: Option<Artifacts>,
    pub log_file: Option<PathBuf>,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.validation.has_errors()
    }
}
