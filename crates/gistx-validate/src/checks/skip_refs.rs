//! Skip rules: the checked field comes before the owner (or is the owner, for
//! postskip) and the target comes strictly after it.

use gistx_model::{
    Column, Issue, IssueKind, OrderRule, Question, QuestionType, Severity, SkipPhase, SkipRule,
};

use super::FieldIndex;

fn checked_field_rule(phase: SkipPhase) -> OrderRule {
    match phase {
        SkipPhase::Pre => OrderRule::StrictlyBefore,
        SkipPhase::Post => OrderRule::AtOrBefore,
    }
}

pub fn check(worksheet: &str, questions: &[Question], index: &FieldIndex) -> Vec<Issue> {
    let mut issues = Vec::new();
    for question in questions {
        for rule in &question.skip_rules {
            for (kind, message) in rule_problems(question, rule, index) {
                issues.push(
                    Issue::new(kind, Severity::Error, worksheet, message)
                        .at_row(question.position.row())
                        .in_column(Column::Skip)
                        .for_field(&question.field_name),
                );
            }
        }
    }
    issues
}

fn rule_problems(
    question: &Question,
    rule: &SkipRule,
    index: &FieldIndex,
) -> Vec<(IssueKind, String)> {
    let mut problems = Vec::new();
    let owner = question.position;

    let check_rule = checked_field_rule(rule.phase);
    match index.get(&rule.check_field) {
        None => problems.push((
            IssueKind::Reference,
            format!(
                "{} checks a nonexistent FieldName: {}",
                rule.phase.element(),
                rule.check_field
            ),
        )),
        Some(entry) => {
            if !check_rule.holds(owner, entry.position) {
                problems.push((
                    IssueKind::Reference,
                    format!(
                        "checkfield {} {} for {}",
                        rule.check_field,
                        check_rule.describe(),
                        rule.phase.element()
                    ),
                ));
            }
            if rule.condition.is_membership()
                && entry.question_type != Some(QuestionType::Checkbox)
            {
                problems.push((
                    IssueKind::Compatibility,
                    format!(
                        "condition '{}' needs a checkbox field, but {} is not a checkbox",
                        rule.condition, rule.check_field
                    ),
                ));
            }
        }
    }

    if rule.target_field == question.field_name {
        problems.push((
            IssueKind::Reference,
            format!("targetfield {} is the current row", rule.target_field),
        ));
    } else {
        match index.get(&rule.target_field) {
            None => problems.push((
                IssueKind::Reference,
                format!("skips to a nonexistent FieldName: {}", rule.target_field),
            )),
            Some(entry) if !OrderRule::StrictlyAfter.holds(owner, entry.position) => {
                problems.push((
                    IssueKind::Reference,
                    format!(
                        "targetfield {} {}",
                        rule.target_field,
                        OrderRule::StrictlyAfter.describe()
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::FieldEntry;
    use gistx_model::{FieldType, Position, SkipCondition};

    fn index(fields: &[(&str, QuestionType)]) -> FieldIndex {
        FieldIndex::new(
            fields
                .iter()
                .enumerate()
                .map(|(i, (name, qt))| FieldEntry {
                    position: Position::new(i + 2),
                    field_name: (*name).to_string(),
                    question_type: Some(*qt),
                })
                .collect(),
        )
    }

    fn owner(row: usize, name: &str, rule: SkipRule) -> Question {
        let mut q = Question::new(Position::new(row), name, QuestionType::Radio, FieldType::Integer);
        q.skip_rules.push(rule);
        q
    }

    fn rule(phase: SkipPhase, check: &str, condition: SkipCondition, target: &str) -> SkipRule {
        SkipRule {
            phase,
            check_field: check.into(),
            condition,
            value: "1".into(),
            target_field: target.into(),
        }
    }

    #[test]
    fn valid_preskip_and_postskip() {
        let index = index(&[
            ("consent", QuestionType::Radio),
            ("age", QuestionType::Radio),
            ("comments", QuestionType::Text),
        ]);
        let questions = [
            owner(3, "age", rule(SkipPhase::Pre, "consent", SkipCondition::Eq, "comments")),
            owner(3, "age", rule(SkipPhase::Post, "age", SkipCondition::Lt, "comments")),
        ];
        assert!(check("t_dd", &questions, &index).is_empty());
    }

    #[test]
    fn preskip_on_own_field_fails() {
        let index = index(&[("age", QuestionType::Radio), ("end", QuestionType::Text)]);
        let issues = check(
            "t_dd",
            &[owner(2, "age", rule(SkipPhase::Pre, "age", SkipCondition::Eq, "end"))],
            &index,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "checkfield age must appear before current row for preskip"
        );
    }

    #[test]
    fn target_before_owner_fails() {
        let index = index(&[("comments", QuestionType::Text), ("age", QuestionType::Radio)]);
        let issues = check(
            "t_dd",
            &[owner(3, "age", rule(SkipPhase::Post, "age", SkipCondition::Lt, "comments"))],
            &index,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Reference);
        assert_eq!(
            issues[0].message,
            "targetfield comments must appear after current row"
        );
    }

    #[test]
    fn self_target_and_missing_fields() {
        let index = index(&[("age", QuestionType::Radio)]);
        let issues = check(
            "t_dd",
            &[owner(2, "age", rule(SkipPhase::Post, "ghost", SkipCondition::Eq, "age"))],
            &index,
        );
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "postskip checks a nonexistent FieldName: ghost",
                "targetfield age is the current row",
            ]
        );
    }

    #[test]
    fn membership_needs_checkbox() {
        let index = index(&[
            ("symptoms", QuestionType::Checkbox),
            ("age", QuestionType::Radio),
            ("end", QuestionType::Text),
        ]);
        let ok = owner(3, "age", rule(SkipPhase::Pre, "symptoms", SkipCondition::Contains, "end"));
        assert!(check("t_dd", &[ok], &index).is_empty());

        let bad = owner(3, "age", rule(SkipPhase::Post, "age", SkipCondition::DoesNotContain, "end"));
        let issues = check("t_dd", &[bad], &index);
        assert_eq!(issues[0].kind, IssueKind::Compatibility);
    }
}
