//! Skip cell: `preskip:` / `postskip:` rules.
//!
//! A rule reads `<phase>: if <checkfield> <condition> <value>, skip to <target>`.
//! The text before the comma is split on single spaces and must give exactly
//! five tokens, or seven when the condition is the three-word
//! `does not contain`.

use gistx_model::{Column, IssueKind, SkipCondition, SkipPhase, SkipRule};

use crate::collector::{Checkpoint, IssueSink};
use crate::grammar::cell_lines;

const CONDITION_TOKENS: usize = 5;
const DOES_NOT_CONTAIN_TOKENS: usize = 7;
const DOES_NOT_CONTAIN: &str = "does not contain";

pub fn parse_skip_rules(text: &str, sink: &mut IssueSink<'_>) -> Option<Vec<SkipRule>> {
    let mark = Checkpoint::new(sink);
    let rules: Vec<_> = cell_lines(text)
        .filter_map(|line| match parse_rule(line) {
            Ok(rule) => Some(rule),
            Err(reason) => {
                sink.error(
                    IssueKind::FieldFormat,
                    Column::Skip,
                    format!("{reason}: {line}"),
                );
                None
            }
        })
        .collect();
    mark.clean(sink).then_some(rules)
}

fn parse_rule(line: &str) -> Result<SkipRule, String> {
    let phase = if line.starts_with(SkipPhase::Pre.prefix()) {
        SkipPhase::Pre
    } else if line.starts_with(SkipPhase::Post.prefix()) {
        SkipPhase::Post
    } else {
        return Err("skip must start with 'preskip:' or 'postskip:'".to_string());
    };

    let sections: Vec<&str> = line.split(',').collect();
    let [condition_section, skip_section] = sections.as_slice() else {
        return Err("skip must contain exactly one comma".to_string());
    };

    let tokens: Vec<&str> = condition_section.split(' ').collect();
    let negated = condition_section.contains(DOES_NOT_CONTAIN);
    let expected = if negated {
        DOES_NOT_CONTAIN_TOKENS
    } else {
        CONDITION_TOKENS
    };
    if tokens.len() != expected {
        return Err(format!(
            "expected '{} if <field> <condition> <value>' with single spaces",
            phase.prefix()
        ));
    }
    if tokens[1] != "if" {
        return Err("expected 'if' after the skip prefix".to_string());
    }

    let check_field = tokens[2];
    let (condition, value) = if negated {
        if tokens[3..6] != ["does", "not", "contain"] {
            return Err(format!("'{DOES_NOT_CONTAIN}' must follow the checked field"));
        }
        (SkipCondition::DoesNotContain, tokens[6])
    } else {
        let condition = SkipCondition::parse_token(tokens[3])
            .ok_or_else(|| format!("invalid skip condition '{}'", tokens[3]))?;
        (condition, tokens[4])
    };
    if check_field.is_empty() || value.is_empty() {
        return Err("skip condition has an empty field or value".to_string());
    }

    let target_tokens: Vec<&str> = skip_section.split_whitespace().collect();
    let ["skip", "to", target_field] = target_tokens.as_slice() else {
        return Err("expected 'skip to <field>' after the comma".to_string());
    };

    Ok(SkipRule {
        phase,
        check_field: check_field.to_string(),
        condition,
        value: value.to_string(),
        target_field: (*target_field).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gistx_model::{Issue, Position};

    fn run(text: &str) -> (Option<Vec<SkipRule>>, Vec<Issue>) {
        let mut sink = IssueSink::new("t_dd", Position::new(5));
        let rules = parse_skip_rules(text, &mut sink);
        (rules, sink.into_issues())
    }

    #[test]
    fn comparison_rule() {
        let (rules, issues) = run("preskip: if age < 18, skip to comments");
        assert!(issues.is_empty());
        assert_eq!(
            rules.unwrap(),
            vec![SkipRule {
                phase: SkipPhase::Pre,
                check_field: "age".into(),
                condition: SkipCondition::Lt,
                value: "18".into(),
                target_field: "comments".into(),
            }]
        );
    }

    #[test]
    fn contains_and_does_not_contain() {
        let (rules, issues) = run(
            "postskip: if symptoms 'contains' 3, skip to fever_days\n\
             postskip: if symptoms does not contain 3, skip to end_section",
        );
        assert!(issues.is_empty(), "{issues:?}");
        let rules = rules.unwrap();
        assert_eq!(rules[0].condition, SkipCondition::Contains);
        assert_eq!(rules[0].value, "3");
        assert_eq!(rules[1].condition, SkipCondition::DoesNotContain);
        assert_eq!(rules[1].value, "3");
        assert_eq!(rules[1].target_field, "end_section");
        assert_eq!(rules[1].phase, SkipPhase::Post);
    }

    #[test]
    fn segmentation_errors() {
        let cases = [
            ("skip: if a = 1, skip to b", "skip must start with"),
            ("preskip: if a = 1 skip to b", "skip must contain exactly one comma"),
            ("preskip: if a = 1, skip to b, c", "skip must contain exactly one comma"),
            ("preskip: if a  = 1, skip to b", "expected 'preskip: if"),
            ("preskip: when a = 1, skip to b", "expected 'if'"),
            ("preskip: if a == 1, skip to b", "invalid skip condition '=='"),
            ("preskip: if a contains 1, skip to b", "invalid skip condition 'contains'"),
            ("preskip: if a = 1, jump to b", "expected 'skip to <field>'"),
            (
                "preskip: if a does not contain 1 2, skip to b",
                "expected 'preskip: if",
            ),
        ];
        for (line, expected) in cases {
            let (rules, issues) = run(line);
            assert!(rules.is_none(), "{line}");
            assert!(issues[0].message.starts_with(expected), "{line}: {}", issues[0].message);
            assert_eq!(issues[0].column, Some(Column::Skip));
        }
    }
}
