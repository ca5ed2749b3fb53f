//! LogicCheck references must name existing fields on earlier rows.

use gistx_model::{Column, Issue, IssueKind, OrderRule, Question};

use super::FieldIndex;

pub fn check(worksheet: &str, questions: &[Question], index: &FieldIndex) -> Vec<Issue> {
    let mut issues = Vec::new();

    for question in questions {
        let fields = question
            .logic_checks
            .iter()
            .filter(|logic| !logic.is_unique_check)
            .flat_map(|logic| logic.referenced_fields.iter());

        for field in fields {
            let problem = match index.get(field) {
                None => format!("LogicCheck uses a nonexistent FieldName: {field}"),
                Some(entry) if !OrderRule::StrictlyBefore.holds(question.position, entry.position) => {
                    format!(
                        "LogicCheck field {field} {} (found at row {})",
                        OrderRule::StrictlyBefore.describe(),
                        entry.position
                    )
                }
                Some(_) => continue,
            };
            issues.push(
                Issue::error(IssueKind::Reference, worksheet, problem)
                    .at_row(question.position.row())
                    .in_column(Column::LogicCheck)
                    .for_field(&question.field_name),
            );
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::FieldEntry;
    use gistx_model::{FieldType, LogicCheck, Position, QuestionType};

    fn question(row: usize, name: &str, expression: &str) -> Question {
        let mut q = Question::new(Position::new(row), name, QuestionType::Text, FieldType::Integer);
        q.logic_checks.push(LogicCheck {
            expression: expression.to_string(),
            message: "msg".into(),
            is_unique_check: false,
            referenced_fields: crate::parsers::referenced_fields(expression),
        });
        q
    }

    fn index(names: &[&str]) -> FieldIndex {
        FieldIndex::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| FieldEntry {
                    position: Position::new(i + 2),
                    field_name: (*name).to_string(),
                    question_type: Some(QuestionType::Text),
                })
                .collect(),
        )
    }

    #[test]
    fn earlier_reference_passes() {
        let index = index(&["height", "weight"]);
        let questions = [question(3, "weight", "height > 0")];
        assert!(check("t_dd", &questions, &index).is_empty());
    }

    #[test]
    fn same_or_later_reference_fails() {
        let index = index(&["height", "weight"]);
        let questions = [
            question(2, "height", "weight > 0"),
            question(3, "weight", "weight > 0"),
        ];
        let issues = check("t_dd", &questions, &index);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::Reference));
        assert_eq!(
            issues[0].message,
            "LogicCheck field weight must appear before current row (found at row 3)"
        );
        assert_eq!(issues[1].row, Some(3));
    }

    #[test]
    fn missing_reference_fails() {
        let index = index(&["height"]);
        let issues = check("t_dd", &[question(2, "height", "bmi > 0")], &index);
        assert_eq!(issues[0].message, "LogicCheck uses a nonexistent FieldName: bmi");
    }

    #[test]
    fn unique_checks_are_skipped() {
        let mut q = Question::new(Position::new(2), "id", QuestionType::Text, FieldType::Text);
        q.logic_checks.push(LogicCheck::unique("dup"));
        assert!(check("t_dd", &[q], &index(&["id"])).is_empty());
    }
}
