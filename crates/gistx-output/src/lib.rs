//! GiSTX artifact generation.
//!
//! - **Survey XML**: one document per questionnaire worksheet ([`emit`], [`write_xml`])
//! - **Manifest**: `survey_manifest.gistx` ([`build_manifest`], [`write_manifest`])
//! - **Package**: `{surveyId}.zip` bundling everything plus lookup CSVs ([`build_package`])

mod error;
mod manifest;
mod package;
mod xml;

pub use error::{OutputError, Result};
pub use manifest::{build_manifest, manifest_json, write_manifest};
pub use package::{PackageReport, build_package, zip_file_name};
pub use xml::{emit, verify_well_formed, write_xml, xml_file_name};
