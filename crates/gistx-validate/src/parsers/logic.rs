//! LogicCheck cell: `expression; 'message'` per line.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use gistx_model::{Column, IssueKind, LogicCheck, UNIQUE_EXPRESSION};
use regex::Regex;

use crate::collector::{Checkpoint, IssueSink};
use crate::grammar::cell_lines;

static QUOTED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'[^']*'").expect("Invalid quoted string regex"));

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z_][a-z0-9_]*\b").expect("Invalid identifier regex")
});

static OPERATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(=|!=|<>|>|<|\band\b|\bor\b)").expect("Invalid operator regex")
});

const KEYWORDS: [&str; 3] = ["and", "or", "not"];

pub fn parse_logic_checks(text: &str, sink: &mut IssueSink<'_>) -> Option<Vec<LogicCheck>> {
    let mark = Checkpoint::new(sink);
    let checks: Vec<_> = cell_lines(text)
        .filter_map(|line| parse_line(line, sink))
        .collect();
    mark.clean(sink).then_some(checks)
}

fn parse_line(line: &str, sink: &mut IssueSink<'_>) -> Option<LogicCheck> {
    let Some((expression, message)) = line.split_once(';') else {
        sink.error(
            IssueKind::FieldFormat,
            Column::LogicCheck,
            format!("missing ';' between expression and message: {line}"),
        );
        return None;
    };
    if message.contains(';') {
        sink.error(
            IssueKind::FieldFormat,
            Column::LogicCheck,
            format!("more than one ';' in logic check: {line}"),
        );
        return None;
    }

    let expression = expression.trim();
    let message = message.trim();
    let Some(message) = message
        .strip_prefix('\'')
        .and_then(|m| m.strip_suffix('\''))
    else {
        sink.error(
            IssueKind::FieldFormat,
            Column::LogicCheck,
            format!("message must be in single quotes: {line}"),
        );
        return None;
    };

    if expression.is_empty() {
        sink.error(
            IssueKind::FieldFormat,
            Column::LogicCheck,
            format!("logic check has no expression: {line}"),
        );
        return None;
    }

    if expression == UNIQUE_EXPRESSION {
        return Some(LogicCheck::unique(message));
    }

    let unquoted = QUOTED_REGEX.replace_all(expression, "");
    if !OPERATOR_REGEX.is_match(&unquoted) {
        sink.error(
            IssueKind::FieldFormat,
            Column::LogicCheck,
            format!("no operator found in logic check: {line}"),
        );
        return None;
    }

    Some(LogicCheck {
        expression: expression.to_string(),
        message: message.to_string(),
        is_unique_check: false,
        referenced_fields: referenced_fields(expression),
    })
}

/// Identifiers in the expression outside quoted strings, minus keywords.
pub fn referenced_fields(expression: &str) -> BTreeSet<String> {
    let unquoted = QUOTED_REGEX.replace_all(expression, "");
    IDENTIFIER_REGEX
        .find_iter(&unquoted)
        .map(|m| m.as_str())
        .filter(|token| !KEYWORDS.contains(&token.to_lowercase().as_str()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gistx_model::{Issue, Position};

    fn run(text: &str) -> (Option<Vec<LogicCheck>>, Vec<Issue>) {
        let mut sink = IssueSink::new("t_dd", Position::new(4));
        let checks = parse_logic_checks(text, &mut sink);
        (checks, sink.into_issues())
    }

    #[test]
    fn extracts_references_outside_quotes() {
        let (checks, issues) = run("age >= min_age and sex = 'male or other'; 'Too young'");
        assert!(issues.is_empty());
        let check = &checks.unwrap()[0];
        assert_eq!(check.message, "Too young");
        assert_eq!(
            check.referenced_fields.iter().collect::<Vec<_>>(),
            vec!["age", "min_age", "sex"]
        );
    }

    #[test]
    fn numbers_are_not_fields() {
        assert_eq!(
            referenced_fields("weight > 2.5 OR NOT height < 100"),
            BTreeSet::from(["height".to_string(), "weight".to_string()])
        );
    }

    #[test]
    fn unique_check() {
        let (checks, _) = run("unique; 'ID already used'");
        let check = &checks.unwrap()[0];
        assert!(check.is_unique_check);
        assert!(check.referenced_fields.is_empty());
    }

    #[test]
    fn syntax_errors() {
        let cases = [
            ("age > 5 'no semicolon'", "missing ';' between expression and message"),
            ("age > 5; 'a'; 'b'", "more than one ';' in logic check"),
            ("age > 5; no quotes", "message must be in single quotes"),
            ("age; 'no operator'", "no operator found in logic check"),
        ];
        for (line, expected) in cases {
            let (checks, issues) = run(line);
            assert!(checks.is_none(), "{line}");
            assert!(issues[0].message.starts_with(expected), "{line}");
        }
    }

    #[test]
    fn one_check_per_line() {
        let (checks, _) = run("a > 1; 'x'\r\nb < 2; 'y'");
        assert_eq!(checks.unwrap().len(), 2);
    }
}
