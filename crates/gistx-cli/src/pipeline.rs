//! Run pipeline: workbook → validation gate → XML, manifest, package.
//!
//! Every stage is a function over a [`WorkbookSource`], so the same flow runs
//! against a spreadsheet on disk or an in-memory workbook.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use gistx_ingest::{
    WorkbookSource, XlsxWorkbook, questionnaire_worksheets, read_crfs, scan_csv_folder,
};
use gistx_model::CRFS_WORKSHEET;
use gistx_output::{build_manifest, build_package, write_manifest, write_xml};
use gistx_validate::validate_worksheets;
use tracing::{error, info, info_span, warn};

use crate::config::RunSettings;
use crate::run_log::RunLog;
use crate::types::{Artifacts, RunOutcome, WorkbookValidation};

pub fn open_workbook(path: &Path) -> Result<XlsxWorkbook> {
    XlsxWorkbook::open(path).with_context(|| format!("open workbook {}", path.display()))
}

/// Validates every questionnaire worksheet in parallel and reads `crfs`.
///
/// The result is only complete once all worksheets are done, so the
/// all-or-nothing decision can be taken on the whole workbook.
pub fn validate_workbook<S: WorkbookSource + ?Sized>(book: &S) -> Result<WorkbookValidation> {
    let start = Instant::now();
    let names = book.worksheet_names();

    let worksheets = questionnaire_worksheets(&names)
        .iter()
        .map(|name| book.worksheet(name))
        .collect::<gistx_ingest::Result<Vec<_>>>()
        .context("read questionnaire worksheets")?;
    let reports = validate_worksheets(&worksheets);

    let crfs = if names.iter().any(|name| name == CRFS_WORKSHEET) {
        let sheet = book
            .worksheet(CRFS_WORKSHEET)
            .context("read crfs worksheet")?;
        Some(read_crfs(&sheet))
    } else {
        None
    };

    let validation = WorkbookValidation {
        worksheets: reports,
        crfs,
    };
    info!(
        worksheets = validation.worksheets.len(),
        questions = validation.question_count(),
        errors = validation.error_count(),
        warnings = validation.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "workbook validated"
    );
    Ok(validation)
}

/// Check-only run: validation without artifacts.
pub fn check(path: &Path) -> Result<RunOutcome> {
    let span = info_span!("check", workbook = %path.display());
    let _guard = span.enter();
    let book = open_workbook(path)?;
    let validation = validate_workbook(&book)?;
    Ok(RunOutcome {
        workbook: path.to_path_buf(),
        validation,
        artifacts: None,
        log_file: None,
    })
}

/// Full run against the workbook named in `settings`.
pub fn generate(settings: &RunSettings) -> Result<RunOutcome> {
    with_run_log(settings, |log| {
        let book = open_workbook(&settings.excel_file)?;
        generate_with_log(&book, settings, log)
    })
}

/// Full run against an already loaded workbook.
pub fn generate_from_source<S: WorkbookSource + ?Sized>(
    book: &S,
    settings: &RunSettings,
) -> Result<RunOutcome> {
    with_run_log(settings, |log| generate_with_log(book, settings, log))
}

/// Runs `stage` and writes the run log afterwards, whatever the outcome.
fn with_run_log<F>(settings: &RunSettings, stage: F) -> Result<RunOutcome>
where
    F: FnOnce(&mut RunLog) -> Result<RunOutcome>,
{
    let span = info_span!("run", survey_id = %settings.survey_id);
    let _guard = span.enter();

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "create output directory {}",
            settings.output_dir.display()
        )
    })?;
    let mut log = RunLog::new(&settings.excel_file);
    let result = stage(&mut log);
    if let Err(error) = &result {
        log.failure(error);
    }

    let written = log.write_to(&settings.output_dir);
    match (result, written) {
        (Ok(mut outcome), Ok(path)) => {
            outcome.log_file = Some(path);
            Ok(outcome)
        }
        (Ok(_), Err(source)) => Err(source).context("write run log"),
        (Err(error), Ok(_)) => Err(error),
        (Err(error), Err(log_error)) => {
            error!(%log_error, "run log could not be written");
            Err(error)
        }
    }
}

fn generate_with_log<S: WorkbookSource + ?Sized>(
    book: &S,
    settings: &RunSettings,
    log: &mut RunLog,
) -> Result<RunOutcome> {
    let validation = validate_workbook(book)?;
    for report in &validation.worksheets {
        log.worksheet(report);
    }
    if let Some(crfs) = &validation.crfs {
        log.crfs(crfs);
    }
    log.summary(&validation);

    let mut outcome = RunOutcome {
        workbook: settings.excel_file.clone(),
        validation,
        artifacts: None,
        log_file: None,
    };
    if outcome.has_errors() {
        warn!(
            errors = outcome.validation.error_count(),
            "validation failed; nothing generated"
        );
        return Ok(outcome);
    }

    outcome.artifacts = Some(write_artifacts(&outcome.validation, settings, log)?);
    Ok(outcome)
}

/// Writes the XML files and the manifest, then packages them.
fn write_artifacts(
    validation: &WorkbookValidation,
    settings: &RunSettings,
    log: &mut RunLog,
) -> Result<Artifacts> {
    let span = info_span!("generate", output_dir = %settings.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    log.blank();
    let mut xml_files: Vec<PathBuf> = Vec::with_capacity(validation.worksheets.len());
    for report in &validation.worksheets {
        let path = write_xml(&settings.output_dir, &report.worksheet, &report.questions)
            .with_context(|| format!("generate XML for worksheet '{}'", report.worksheet))?;
        log.xml_written(&path);
        xml_files.push(path);
    }

    let crfs = validation
        .crfs
        .as_ref()
        .map(|report| report.entries.clone())
        .unwrap_or_default();
    let manifest = build_manifest(&settings.survey_name, &settings.survey_id, &xml_files, crfs);
    let manifest_path =
        write_manifest(&settings.output_dir, &manifest).context("write survey manifest")?;
    log.manifest_written();

    let csv = scan_csv_folder(settings.csv_dir.as_deref()).context("scan CSV folder")?;
    let mut generated = xml_files.clone();
    generated.push(manifest_path.clone());
    let package = build_package(
        &settings.output_dir,
        &settings.survey_id,
        &generated,
        &csv,
        settings.cleanup,
    )
    .context("build survey package")?;
    log.package(&package, &csv);

    info!(
        xml_files = xml_files.len(),
        csv_files = package.csv_files.len(),
        zip = %package.zip_path.display(),
        duration_ms = start.elapsed().as_millis(),
        "survey package generated"
    );
    Ok(Artifacts {
        xml_files,
        manifest: manifest_path,
        package,
    })
}
