//! Manifest builder: `survey_manifest.gistx`.

use std::path::{Path, PathBuf};

use gistx_model::{CrfsEntry, MANIFEST_FILE_NAME, SurveyManifest};
use tracing::debug;

use crate::error::{OutputError, Result};

/// Assembles the manifest from the emitted XML files, in emission order.
pub fn build_manifest(
    survey_name: &str,
    survey_id: &str,
    xml_files: &[PathBuf],
    crfs: Vec<CrfsEntry>,
) -> SurveyManifest {
    let xml_files = xml_files
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    SurveyManifest::new(survey_name, survey_id, xml_files, crfs)
}

/// Pretty-printed JSON; absent crfs attributes are left out entirely.
pub fn manifest_json(manifest: &SurveyManifest) -> Result<String> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

pub fn write_manifest(dir: &Path, manifest: &SurveyManifest) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let json = manifest_json(manifest)?;
    std::fs::write(&path, json).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), xml_files = manifest.xml_files.len(), "wrote manifest");
    Ok(path)
}
