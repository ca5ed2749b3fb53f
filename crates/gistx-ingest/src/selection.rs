//! Which worksheets take part in a run.

use gistx_model::CRFS_WORKSHEET;

const QUESTIONNAIRE_SUFFIXES: [&str; 2] = ["_dd", "_xml"];

/// Role of a worksheet, decided by its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorksheetRole {
    /// `<form>_dd` or `<form>_xml`: validated and emitted as `<form>.xml`.
    Questionnaire,
    /// Exactly `crfs`.
    Crfs,
    Ignored,
}

pub fn classify_worksheet(name: &str) -> WorksheetRole {
    if name == CRFS_WORKSHEET {
        WorksheetRole::Crfs
    } else if questionnaire_stem(name).is_some() {
        WorksheetRole::Questionnaire
    } else {
        WorksheetRole::Ignored
    }
}

/// Form name with the `_dd` / `_xml` suffix stripped.
pub fn questionnaire_stem(name: &str) -> Option<&str> {
    QUESTIONNAIRE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
}

/// Questionnaire worksheet names, in workbook order.
pub fn questionnaire_worksheets(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| classify_worksheet(name) == WorksheetRole::Questionnaire)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_name() {
        assert_eq!(classify_worksheet("crfs"), WorksheetRole::Crfs);
        assert_eq!(classify_worksheet("CRFS"), WorksheetRole::Ignored);
        assert_eq!(classify_worksheet("household_dd"), WorksheetRole::Questionnaire);
        assert_eq!(classify_worksheet("visit_xml"), WorksheetRole::Questionnaire);
        assert_eq!(classify_worksheet("notes"), WorksheetRole::Ignored);
        assert_eq!(classify_worksheet("_dd"), WorksheetRole::Ignored);
    }

    #[test]
    fn stem_strips_one_suffix() {
        assert_eq!(questionnaire_stem("household_dd"), Some("household"));
        assert_eq!(questionnaire_stem("visit_xml"), Some("visit"));
        assert_eq!(questionnaire_stem("odd_xml_dd"), Some("odd_xml"));
        assert_eq!(questionnaire_stem("lookup"), None);
    }

    #[test]
    fn keeps_workbook_order() {
        let names = vec![
            "z_dd".to_string(),
            "crfs".to_string(),
            "readme".to_string(),
            "a_xml".to_string(),
        ];
        assert_eq!(questionnaire_worksheets(&names), vec!["z_dd", "a_xml"]);
    }
}
