//! `config.json` loading and command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Run configuration as stored in `config.json`. Missing keys are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub excel_file: String,
    pub csv_files: String,
    pub output_path: String,
    pub survey_name: String,
    pub survey_id: String,
}

/// Values given on the command line; each one replaces the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub excel_file: Option<PathBuf>,
    pub csv_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub survey_name: Option<String>,
    pub survey_id: Option<String>,
}

/// Fully resolved inputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub excel_file: PathBuf,
    pub csv_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub survey_name: String,
    pub survey_id: String,
    /// Delete the generated XML and manifest once they are in the ZIP.
    pub cleanup: bool,
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse configuration JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Loads `path` when given. Without a path, `config.json` is used if it
    /// exists; otherwise every value must come from the command line.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.excel_file {
            self.excel_file = path.to_string_lossy().into_owned();
        }
        if let Some(path) = overrides.csv_dir {
            self.csv_files = path.to_string_lossy().into_owned();
        }
        if let Some(path) = overrides.output_dir {
            self.output_path = path.to_string_lossy().into_owned();
        }
        if let Some(name) = overrides.survey_name {
            self.survey_name = name;
        }
        if let Some(id) = overrides.survey_id {
            self.survey_id = id;
        }
        self
    }

    /// Workbook path, required by every command that reads one.
    pub fn excel_path(&self) -> Result<PathBuf> {
        let excel = self.excel_file.trim();
        if excel.is_empty() {
            bail!("no workbook given: set excelFile in the configuration or pass --excel-file");
        }
        Ok(PathBuf::from(excel))
    }

    /// Settings for a full generation run. `surveyId` names the database and
    /// the ZIP, so it is required here.
    pub fn into_settings(self, cleanup: bool) -> Result<RunSettings> {
        let excel_file = self.excel_path()?;
        let survey_id = self.survey_id.trim().to_string();
        if survey_id.is_empty() {
            bail!("no survey id given: set surveyId in the configuration or pass --survey-id");
        }
        let output_dir = match self.output_path.trim() {
            "" => PathBuf::from("."),
            path => PathBuf::from(path),
        };
        let csv_dir = match self.csv_files.trim().trim_end_matches(['/', '\\']) {
            "" => None,
            path => Some(PathBuf::from(path)),
        };
        Ok(RunSettings {
            excel_file,
            csv_dir,
            output_dir,
            survey_name: self.survey_name,
            survey_id,
            cleanup,
        })
    }
}
