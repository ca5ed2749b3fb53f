//! The run log, `gistlogfile.txt`, written next to the generated files.
//!
//! Unlike the tracing output this is a user-facing artifact: one entry per
//! check performed, a summary, what was written, and a closing marker. It is
//! produced on every run, including runs that stop early.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use gistx_ingest::{CrfsReport, CsvFolder, IngestError};
use gistx_model::{CRFS_WORKSHEET, MANIFEST_FILE_NAME};
use gistx_output::{OutputError, PackageReport};
use gistx_validate::WorksheetReport;

use crate::types::WorkbookValidation;

pub const RUN_LOG_FILE_NAME: &str = "gistlogfile.txt";

const END_MARKER: &str = "End of log file";
const RULE_WIDTH: usize = 80;

/// Lines of the run log, in the order they happened.
#[derive(Debug, Clone)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new(workbook: &Path) -> Self {
        Self {
            lines: vec![format!("Log file for: {}", workbook.display())],
        }
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every check of the worksheet, passed or not, then its verdict.
    pub fn worksheet(&mut self, report: &WorksheetReport) {
        self.blank();
        self.line(format!("Checking worksheet: '{}'", report.worksheet));
        for check in &report.checks {
            let verdict = match (check.passed(), check.issues.len()) {
                (true, 0) => "passed".to_string(),
                (true, warnings) => format!("passed with {}", plural(warnings, "warning")),
                (false, _) => format!("failed with {}", plural(check.issues.len(), "issue")),
            };
            self.line(format!("  {}: {verdict}", check.label));
            for issue in &check.issues {
                self.line(format!("    {issue}"));
            }
        }
        let errors = report.error_count();
        if errors == 0 {
            self.line(format!("No errors found in '{}'", report.worksheet));
        } else {
            self.line(format!(
                "{} found in '{}'",
                plural(errors, "error"),
                report.worksheet
            ));
        }
    }

    pub fn crfs(&mut self, report: &CrfsReport) {
        self.blank();
        self.line(format!("Reading worksheet: '{CRFS_WORKSHEET}'"));
        self.line(format!("  {} read", plural(report.entries.len(), "entry")));
        for issue in &report.issues {
            self.line(format!("    {issue}"));
        }
    }

    pub fn summary(&mut self, validation: &WorkbookValidation) {
        self.blank();
        self.line(format!(
            "Summary: {}, {}, {}, {}",
            plural(validation.worksheets.len(), "worksheet"),
            plural(validation.question_count(), "question"),
            plural(validation.error_count(), "error"),
            plural(validation.warning_count(), "warning"),
        ));
        if validation.has_errors() {
            self.line("Generation skipped: fix the errors above and run again.");
        }
    }

    pub fn xml_written(&mut self, path: &Path) {
        self.line(format!("Generated {}", file_name(path)));
    }

    pub fn manifest_written(&mut self) {
        self.blank();
        self.line(format!("Successfully generated {MANIFEST_FILE_NAME}"));
    }

    /// Archive contents, CSV discovery outcome, and cleanup.
    pub fn package(&mut self, report: &PackageReport, csv: &CsvFolder) {
        self.blank();
        for name in &report.generated {
            self.line(format!("Added to zip: {name}"));
        }
        match csv {
            CsvFolder::NotConfigured => {}
            CsvFolder::Missing(dir) => self.line(format!(
                "WARNING: CSV files directory not found: {}",
                dir.display()
            )),
            CsvFolder::Empty(dir) => {
                self.line(format!("WARNING: No CSV files found in {}", dir.display()));
            }
            CsvFolder::Found(_) => {
                self.blank();
                self.line("Adding CSV files to package:");
                for name in &report.csv_files {
                    self.line(format!("Added to zip: {name}"));
                }
            }
        }
        self.blank();
        self.line(format!(
            "Successfully created zip file: {}",
            report.zip_path.display()
        ));
        for name in &report.deleted {
            self.line(format!("Deleted temporary file: {name}"));
        }
    }

    /// Records the error that ended the run.
    pub fn failure(&mut self, error: &anyhow::Error) {
        let ingest = error.chain().find_map(|e| e.downcast_ref::<IngestError>());
        let output = error.chain().find_map(|e| e.downcast_ref::<OutputError>());
        match (ingest, output) {
            (Some(IngestError::WorkbookNotFound { path }), _) => {
                self.line("ERROR: Excel file not found!");
                self.line(path.display().to_string());
            }
            (_, Some(OutputError::MalformedXml { file, message })) => {
                self.line(format!("CRITICAL ERROR: XML Syntax Error in file '{file}'"));
                self.line(format!("Details: {message}"));
            }
            _ => self.line(format!("ERROR: {error:#}")),
        }
    }

    /// The log text, closed by the end-of-log marker.
    pub fn render(&self) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut text = String::new();
        for line in self.lines.iter().map(String::as_str).chain([
            "",
            rule.as_str(),
            END_MARKER,
            rule.as_str(),
        ]) {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Writes `<dir>/gistlogfile.txt`, replacing an earlier log.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(RUN_LOG_FILE_NAME);
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(path)
    }
}

/// Whether `text` ends with the closing marker block.
pub fn is_complete(text: &str) -> bool {
    let rule = "-".repeat(RULE_WIDTH);
    let tail: Vec<&str> = text.lines().rev().take(3).collect();
    tail == [rule.as_str(), END_MARKER, rule.as_str()]
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun) {
        (1, _) => format!("1 {noun}"),
        (_, "entry") => format!("{count} entries"),
        _ => format!("{count} {noun}s"),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
