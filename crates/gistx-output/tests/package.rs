//! Package builder tests against a scratch output folder.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use gistx_ingest::{CsvFolder, scan_csv_folder};
use gistx_output::{build_manifest, build_package, write_manifest};
use tempfile::TempDir;
use zip::ZipArchive;

fn touch(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn packages_generated_files_and_csvs() {
    let out = TempDir::new().unwrap();
    let lookups = TempDir::new().unwrap();
    touch(lookups.path(), "districts.csv", "id,name\n1,North\n");
    touch(lookups.path(), "notes.txt", "ignored");

    let visit = touch(out.path(), "visit.xml", "<survey/>");
    let manifest = build_manifest("Survey", "hh2024", &[visit.clone()], Vec::new());
    let manifest_path = write_manifest(out.path(), &manifest).unwrap();
    let csv = scan_csv_folder(Some(lookups.path())).unwrap();

    let report = build_package(
        out.path(),
        "hh2024",
        &[visit.clone(), manifest_path.clone()],
        &csv,
        false,
    )
    .unwrap();

    assert_eq!(report.zip_path, out.path().join("hh2024.zip"));
    assert_eq!(report.generated, vec!["visit.xml", "survey_manifest.gistx"]);
    assert_eq!(report.csv_files, vec!["districts.csv"]);
    assert!(report.deleted.is_empty());
    assert_eq!(
        archive_names(&report.zip_path),
        vec!["districts.csv", "survey_manifest.gistx", "visit.xml"]
    );
    assert!(visit.exists());
    assert!(manifest_path.exists());
}

#[test]
fn cleanup_removes_generated_files_only() {
    let out = TempDir::new().unwrap();
    let lookups = TempDir::new().unwrap();
    let csv_path = touch(lookups.path(), "villages.csv", "id\n1\n");
    let visit = touch(out.path(), "visit.xml", "<survey/>");
    let csv = CsvFolder::Found(vec![csv_path.clone()]);

    let report = build_package(out.path(), "s1", &[visit.clone()], &csv, true).unwrap();

    assert_eq!(report.deleted, vec!["visit.xml"]);
    assert!(!visit.exists());
    assert!(csv_path.exists());
    assert_eq!(archive_names(&report.zip_path), vec!["villages.csv", "visit.xml"]);
}

#[test]
fn replaces_an_existing_archive() {
    let out = TempDir::new().unwrap();
    touch(out.path(), "s1.zip", "not a zip");
    let enrol = touch(out.path(), "enrol.xml", "<survey/>");

    let report =
        build_package(out.path(), "s1", &[enrol], &CsvFolder::NotConfigured, false).unwrap();

    assert_eq!(archive_names(&report.zip_path), vec!["enrol.xml"]);
}

#[test]
fn missing_inputs_are_skipped() {
    let out = TempDir::new().unwrap();
    let gone = out.path().join("gone.xml");
    let kept = touch(out.path(), "kept.xml", "<survey/>");

    let report = build_package(
        out.path(),
        "s1",
        &[gone, kept],
        &CsvFolder::Missing(out.path().join("csv")),
        true,
    )
    .unwrap();

    assert_eq!(report.generated, vec!["kept.xml"]);
    assert_eq!(report.deleted, vec!["kept.xml"]);
    assert!(report.csv_files.is_empty());
}
