//! FieldName uniqueness. Information rows may repeat names.

use std::collections::BTreeMap;

use gistx_model::{Column, Issue, IssueKind, Position, QuestionType};

use super::FieldIndex;

pub fn check(worksheet: &str, index: &FieldIndex) -> Vec<Issue> {
    let mut seen: BTreeMap<&str, Position> = BTreeMap::new();
    let mut issues = Vec::new();

    for entry in index.entries() {
        if entry.question_type == Some(QuestionType::Information) {
            continue;
        }
        match seen.get(entry.field_name.as_str()) {
            Some(first) => issues.push(
                Issue::error(
                    IssueKind::Duplicate,
                    worksheet,
                    format!(
                        "duplicate FieldName '{}' (first defined at row {first})",
                        entry.field_name
                    ),
                )
                .at_row(entry.position.row())
                .in_column(Column::FieldName)
                .for_field(&entry.field_name),
            ),
            None => {
                seen.insert(&entry.field_name, entry.position);
            }
        }
    }

    issues
}
