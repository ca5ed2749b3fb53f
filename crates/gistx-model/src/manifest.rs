use serde::{Deserialize, Serialize};

use crate::crfs::CrfsEntry;

/// File name of the manifest inside the output directory and the package.
pub const MANIFEST_FILE_NAME: &str = "survey_manifest.gistx";

/// Contents of `survey_manifest.gistx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyManifest {
    pub survey_name: String,
    pub survey_id: String,
    pub database_name: String,
    pub xml_files: Vec<String>,
    pub crfs: Vec<CrfsEntry>,
}

impl SurveyManifest {
    /// Builds a manifest; the database is always named after the survey id.
    pub fn new(
        survey_name: impl Into<String>,
        survey_id: impl Into<String>,
        xml_files: Vec<String>,
        crfs: Vec<CrfsEntry>,
    ) -> Self {
        let survey_id = survey_id.into();
        Self {
            survey_name: survey_name.into(),
            database_name: format!("{survey_id}.sqlite"),
            survey_id,
            xml_files,
            crfs,
        }
    }
}
