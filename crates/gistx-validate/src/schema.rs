//! Header check and the single-column validators.

use gistx_ingest::RawRow;
use gistx_model::{Column, FieldType, Issue, IssueKind, QuestionType};

use crate::collector::IssueSink;

/// Compares row 1 with the fourteen expected column names.
pub fn check_header(worksheet: &str, header: Option<&RawRow>) -> Vec<Issue> {
    let Some(header) = header else {
        return vec![Issue::error(
            IssueKind::Schema,
            worksheet,
            format!(
                "worksheet is empty; header row should be: {}",
                Column::expected_header_line()
            ),
        )];
    };
    Column::ALL
        .iter()
        .filter_map(|&column| {
            let found = header.trimmed(column);
            (found != column.name()).then(|| {
                Issue::error(
                    IssueKind::Schema,
                    worksheet,
                    format!(
                        "header column {} is '{found}', expected '{}'",
                        column.index() + 1,
                        column.name()
                    ),
                )
                .at_row(header.position.row())
                .in_column(column)
            })
        })
        .collect()
}

/// FieldName grammar with a distinct message per kind of mistake.
pub fn check_field_name(name: &str, sink: &mut IssueSink<'_>) {
    let problem = if name.starts_with(|c: char| c.is_ascii_digit()) {
        Some("starts with a number")
    } else if name.starts_with('_') {
        Some("starts with an underscore")
    } else if name.contains(char::is_whitespace) {
        Some("contains a space")
    } else if name.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        Some("contains an invalid character; only letters, digits and underscores are allowed")
    } else if name.chars().any(|c| c.is_ascii_uppercase()) {
        Some("is not all lowercase")
    } else {
        None
    };
    if let Some(problem) = problem {
        sink.error(
            IssueKind::FieldFormat,
            Column::FieldName,
            format!("FieldName '{name}' {problem}"),
        );
    }
}

pub fn parse_question_type(text: &str, sink: &mut IssueSink<'_>) -> Option<QuestionType> {
    match text.parse::<QuestionType>() {
        Ok(question_type) => Some(question_type),
        Err(err) => {
            sink.error(
                IssueKind::FieldFormat,
                Column::QuestionType,
                format!(
                    "{err}; expected one of {}",
                    QuestionType::ALL.map(QuestionType::as_str).join(", ")
                ),
            );
            None
        }
    }
}

pub fn parse_field_type(text: &str, sink: &mut IssueSink<'_>) -> Option<FieldType> {
    match text.parse::<FieldType>() {
        Ok(field_type) => Some(field_type),
        Err(err) => {
            sink.error(
                IssueKind::FieldFormat,
                Column::FieldType,
                format!(
                    "{err}; expected one of {}",
                    FieldType::ALL.map(FieldType::as_str).join(", ")
                ),
            );
            None
        }
    }
}

/// The three QuestionType / FieldType pairings that are constrained.
pub fn check_compatibility(
    question_type: QuestionType,
    field_type: FieldType,
    sink: &mut IssueSink<'_>,
) {
    let message = match question_type {
        QuestionType::Radio if field_type != FieldType::Integer => {
            "radio requires fieldType=integer"
        }
        QuestionType::Checkbox if field_type != FieldType::Text => {
            "checkbox requires fieldType=text"
        }
        QuestionType::Date if !field_type.is_date() => "date requires fieldType=date or datetime",
        _ => return,
    };
    sink.error(IssueKind::Compatibility, Column::FieldType, message);
}

/// Bare or `=`-prefixed integer in `[1, 2000]`.
pub fn parse_max_characters(text: &str, sink: &mut IssueSink<'_>) -> Option<u32> {
    let digits = text.strip_prefix('=').unwrap_or(text).trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        sink.error(
            IssueKind::FieldFormat,
            Column::MaxCharacters,
            format!("MaxCharacters must be a whole number, found '{text}'"),
        );
        return None;
    }
    match digits.parse::<u32>() {
        Ok(value @ 1..=2000) => Some(value),
        _ => {
            sink.error(
                IssueKind::FieldFormat,
                Column::MaxCharacters,
                format!("MaxCharacters must be between 1 and 2000, found '{text}'"),
            );
            None
        }
    }
}

/// DontKnow / Refuse / NA: `True` or `False`, any case. Empty means unset.
pub fn parse_flag(text: &str, column: Column, sink: &mut IssueSink<'_>) -> Option<bool> {
    if text.is_empty() {
        return None;
    }
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        sink.error(
            IssueKind::FieldFormat,
            column,
            format!("{column} must be True or False, found '{text}'"),
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gistx_model::Position;

    fn sink() -> IssueSink<'static> {
        IssueSink::new("t_dd", Position::new(2))
    }

    fn header(names: &[&str]) -> RawRow {
        RawRow::new(1, names.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn header_matches() {
        let names: Vec<_> = Column::ALL.iter().map(|c| c.name()).collect();
        assert!(check_header("t_dd", Some(&header(&names))).is_empty());
    }

    #[test]
    fn header_mismatch_names_position() {
        let mut names: Vec<_> = Column::ALL.iter().map(|c| c.name()).collect();
        names[11] = "N/A";
        let issues = check_header("t_dd", Some(&header(&names)));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Schema);
        assert_eq!(issues[0].message, "header column 12 is 'N/A', expected 'NA'");
    }

    #[test]
    fn missing_header() {
        let issues = check_header("t_dd", None);
        assert!(issues[0].message.starts_with("worksheet is empty"));
    }

    #[test]
    fn field_name_messages() {
        let cases = [
            ("1age", "starts with a number"),
            ("_age", "starts with an underscore"),
            ("my age", "contains a space"),
            ("age-1", "contains an invalid character"),
            ("Age", "is not all lowercase"),
        ];
        for (name, expected) in cases {
            let mut s = sink();
            check_field_name(name, &mut s);
            let issues = s.into_issues();
            assert_eq!(issues.len(), 1, "{name}");
            assert!(issues[0].message.contains(expected), "{name}");
        }
        let mut s = sink();
        check_field_name("age_2", &mut s);
        assert!(!s.has_errors());
    }

    #[test]
    fn compatibility_rules() {
        let cases = [
            (QuestionType::Radio, FieldType::Text, Some("radio requires fieldType=integer")),
            (QuestionType::Radio, FieldType::Integer, None),
            (QuestionType::Checkbox, FieldType::Integer, Some("checkbox requires fieldType=text")),
            (QuestionType::Date, FieldType::Datetime, None),
            (QuestionType::Date, FieldType::Text, Some("date requires fieldType=date or datetime")),
            (QuestionType::Text, FieldType::Integer, None),
        ];
        for (qt, ft, expected) in cases {
            let mut s = sink();
            check_compatibility(qt, ft, &mut s);
            let issues = s.into_issues();
            assert_eq!(issues.first().map(|i| i.message.as_str()), expected);
            if let Some(issue) = issues.first() {
                assert_eq!(issue.kind, IssueKind::Compatibility);
            }
        }
    }

    #[test]
    fn max_characters() {
        let mut s = sink();
        assert_eq!(parse_max_characters("=200", &mut s), Some(200));
        assert_eq!(parse_max_characters("2000", &mut s), Some(2000));
        assert!(!s.has_errors());
        assert_eq!(parse_max_characters("0", &mut s), None);
        assert_eq!(parse_max_characters("2001", &mut s), None);
        assert_eq!(parse_max_characters("ten", &mut s), None);
        assert_eq!(parse_max_characters("-5", &mut s), None);
        assert_eq!(s.error_count(), 4);
    }

    #[test]
    fn flags() {
        let mut s = sink();
        assert_eq!(parse_flag("TRUE", Column::DontKnow, &mut s), Some(true));
        assert_eq!(parse_flag("false", Column::Refuse, &mut s), Some(false));
        assert_eq!(parse_flag("", Column::Na, &mut s), None);
        assert!(!s.has_errors());
        assert_eq!(parse_flag("yes", Column::Na, &mut s), None);
        assert_eq!(
            s.into_issues()[0].message,
            "NA must be True or False, found 'yes'"
        );
    }
}
