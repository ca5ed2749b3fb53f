//! ZIP packaging: `{surveyId}.zip` with the XML files, the manifest and any
//! lookup CSVs.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use gistx_ingest::CsvFolder;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{OutputError, Result};

/// What went into the archive and what was cleaned up afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReport {
    pub zip_path: PathBuf,
    /// Generated files added, by file name, in archive order.
    pub generated: Vec<String>,
    /// CSV files added, by file name.
    pub csv_files: Vec<String>,
    /// Generated files deleted after zipping.
    pub deleted: Vec<String>,
}

pub fn zip_file_name(survey_id: &str) -> String {
    format!("{survey_id}.zip")
}

/// Writes the package into `output_dir`, replacing any earlier archive.
///
/// With `cleanup`, the generated files are deleted once the archive is
/// complete; the CSV inputs are never touched.
pub fn build_package(
    output_dir: &Path,
    survey_id: &str,
    generated: &[PathBuf],
    csv: &CsvFolder,
    cleanup: bool,
) -> Result<PackageReport> {
    let zip_path = output_dir.join(zip_file_name(survey_id));
    if zip_path.exists() {
        std::fs::remove_file(&zip_path).map_err(|source| OutputError::Remove {
            path: zip_path.clone(),
            source,
        })?;
    }

    let file = File::create(&zip_path).map_err(|source| OutputError::Write {
        path: zip_path.clone(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut report = PackageReport {
        zip_path: zip_path.clone(),
        ..PackageReport::default()
    };
    for path in generated {
        if let Some(name) = add_file(&mut zip, &zip_path, path, options)? {
            report.generated.push(name);
        }
    }
    for path in csv.files() {
        if let Some(name) = add_file(&mut zip, &zip_path, path, options)? {
            report.csv_files.push(name);
        }
    }
    zip.finish().map_err(|source| OutputError::Zip {
        path: zip_path.clone(),
        source,
    })?;
    info!(
        path = %zip_path.display(),
        generated = report.generated.len(),
        csv = report.csv_files.len(),
        "package written"
    );

    if cleanup {
        for path in generated.iter().filter(|path| path.exists()) {
            std::fs::remove_file(path).map_err(|source| OutputError::Remove {
                path: path.clone(),
                source,
            })?;
            report.deleted.push(file_name(path));
        }
    }
    Ok(report)
}

/// Stores `path` at the archive root. Files that vanished are skipped.
fn add_file(
    zip: &mut ZipWriter<File>,
    zip_path: &Path,
    path: &Path,
    options: SimpleFileOptions,
) -> Result<Option<String>> {
    if !path.exists() {
        debug!(path = %path.display(), "skipping missing file");
        return Ok(None);
    }
    let name = file_name(path);
    let bytes = std::fs::read(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    zip.start_file(name.as_str(), options)
        .map_err(|source| OutputError::Zip {
            path: zip_path.to_path_buf(),
            source,
        })?;
    zip.write_all(&bytes).map_err(|source| OutputError::Write {
        path: zip_path.to_path_buf(),
        source,
    })?;
    Ok(Some(name))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
