//! CSV lookup files shipped alongside the survey package.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists the CSV files directly inside `dir` (non-recursive).
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Case-insensitive extension
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Outcome of looking for lookup CSVs in the configured folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvFolder {
    /// No folder configured.
    NotConfigured,
    /// Folder configured but absent.
    Missing(PathBuf),
    /// Folder exists but holds no `*.csv` file.
    Empty(PathBuf),
    Found(Vec<PathBuf>),
}

impl CsvFolder {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Self::Found(files) => files,
            _ => &[],
        }
    }
}

/// Scans the optional CSV folder. A missing or empty folder is not an error;
/// the caller decides whether to warn.
pub fn scan_csv_folder(dir: Option<&Path>) -> Result<CsvFolder> {
    let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(CsvFolder::NotConfigured);
    };
    if !dir.is_dir() {
        return Ok(CsvFolder::Missing(dir.to_path_buf()));
    }
    let files = list_csv_files(dir)?;
    if files.is_empty() {
        Ok(CsvFolder::Empty(dir.to_path_buf()))
    } else {
        Ok(CsvFolder::Found(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_lookup_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in &["villages.csv", "districts.CSV", "notes.txt"] {
            std::fs::write(dir.path().join(name), "id,name\n1,A").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();
        dir
    }

    #[test]
    fn lists_only_csv_files_sorted() {
        let dir = create_lookup_dir();
        let files = list_csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["districts.CSV", "villages.csv"]);
    }

    #[test]
    fn not_a_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("villages.csv");
        std::fs::write(&file_path, "data").unwrap();
        assert!(matches!(
            list_csv_files(&file_path),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn scan_reports_folder_state() {
        assert_eq!(scan_csv_folder(None).unwrap(), CsvFolder::NotConfigured);
        assert_eq!(
            scan_csv_folder(Some(Path::new(""))).unwrap(),
            CsvFolder::NotConfigured
        );

        let empty = TempDir::new().unwrap();
        assert_eq!(
            scan_csv_folder(Some(empty.path())).unwrap(),
            CsvFolder::Empty(empty.path().to_path_buf())
        );

        let missing = empty.path().join("absent");
        assert_eq!(
            scan_csv_folder(Some(&missing)).unwrap(),
            CsvFolder::Missing(missing.clone())
        );

        let dir = create_lookup_dir();
        let scan = scan_csv_folder(Some(dir.path())).unwrap();
        assert_eq!(scan.files().len(), 2);
    }
}
