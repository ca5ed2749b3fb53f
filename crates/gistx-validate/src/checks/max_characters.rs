//! Second sweep over validated questions for a missing MaxCharacters.

use gistx_model::{Column, Issue, IssueKind, Question, requires_max_characters};

pub fn check(worksheet: &str, questions: &[Question]) -> Vec<Issue> {
    questions
        .iter()
        .filter(|q| {
            q.max_characters.is_none() && requires_max_characters(q.question_type, q.field_type)
        })
        .map(|q| {
            Issue::error(
                IssueKind::FieldFormat,
                worksheet,
                format!("MaxCharacters for FieldName '{}' needs a value", q.field_name),
            )
            .at_row(q.position.row())
            .in_column(Column::MaxCharacters)
            .for_field(&q.field_name)
        })
        .collect()
}
