//! `calc:<kind>` blocks on automatic questions.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use gistx_model::{
    AgeReference, CalcKind, CalcPart, CalcSpec, CaseWhen, Column, DateOffset, DateUnit,
    FilterOperator, IssueKind, MathOperator, QueryParam,
};
use regex::Regex;

use crate::collector::{Checkpoint, IssueSink};
use crate::grammar::{cell_lines, is_field_name, split_key_value};

static PARAM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(@?\w+)\s*=\s*(\w+)$").expect("Invalid param regex"));

static WHEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s+(=|!=|<>|>=|<=|>|<)\s+(.+?)\s*=>\s*(.+)$").expect("Invalid when regex")
});

/// Every key the calculation language knows, across all kinds.
const KNOWN_KEYS: [&str; 11] = [
    "calc", "value", "field", "sql", "param", "operator", "separator", "part", "when", "else",
    "unit",
];

const REPEATED_KEYS: [&str; 3] = ["param", "part", "when"];

/// Key/value lines of one calc block.
#[derive(Default)]
struct CalcLines<'t> {
    single: BTreeMap<String, &'t str>,
    repeated: BTreeMap<String, Vec<&'t str>>,
}

impl<'t> CalcLines<'t> {
    fn get(&self, key: &str) -> Option<&'t str> {
        self.single.get(key).copied()
    }

    fn all(&self, key: &str) -> &[&'t str] {
        self.repeated.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parses the Responses cell of an automatic question into a [`CalcSpec`].
pub fn parse_calc(text: &str, sink: &mut IssueSink<'_>) -> Option<CalcSpec> {
    let mark = Checkpoint::new(sink);
    let mut lines = cell_lines(text);

    let kind_token = lines
        .next()
        .and_then(split_key_value)
        .map(|(_, kind)| kind)
        .unwrap_or_default();
    let Some(kind) = CalcKind::parse(kind_token) else {
        sink.error(
            IssueKind::FieldFormat,
            Column::Responses,
            format!(
                "unknown calculation type '{kind_token}', expected one of {}",
                CalcKind::ALL.map(CalcKind::as_str).join(", ")
            ),
        );
        return None;
    };

    let mut calc = CalcLines::default();
    for line in lines {
        let Some((key, value)) = split_key_value(line) else {
            sink.error(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("expected 'key:value', found '{line}'"),
            );
            continue;
        };
        if !KNOWN_KEYS.contains(&key.as_str()) {
            sink.warning(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("unknown calculation key '{key}'"),
            );
            continue;
        }
        if !kind.keys().contains(&key.as_str()) {
            sink.warning(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("key '{key}' is not used by calc:{kind}"),
            );
            continue;
        }
        if REPEATED_KEYS.contains(&key.as_str()) {
            calc.repeated.entry(key).or_default().push(value);
        } else {
            calc.single.insert(key, value);
        }
    }

    let spec = build(kind, &calc, sink);
    if mark.clean(sink) { spec } else { None }
}

fn build(kind: CalcKind, calc: &CalcLines<'_>, sink: &mut IssueSink<'_>) -> Option<CalcSpec> {
    match kind {
        CalcKind::Constant => Some(CalcSpec::Constant {
            value: required(kind, calc, "value", sink)?,
        }),
        CalcKind::Lookup => Some(CalcSpec::Lookup {
            field: required(kind, calc, "field", sink)?,
        }),
        CalcKind::Query => {
            let sql = required(kind, calc, "sql", sink);
            let params: Vec<_> = calc
                .all("param")
                .iter()
                .filter_map(|line| parse_param(line, sink))
                .collect();
            if calc.all("param").is_empty() {
                fail::<()>(sink, "query requires at least 1 param");
            }
            Some(CalcSpec::Query { sql: sql?, params })
        }
        CalcKind::Math => {
            let operator = match calc.get("operator") {
                None | Some("") => fail(sink, "math requires operator"),
                Some(token) => MathOperator::parse(token).or_else(|| {
                    fail(
                        sink,
                        &format!("invalid math operator '{token}', expected +, -, * or /"),
                    )
                }),
            };
            let parts = parse_parts(calc, sink);
            if calc.all("part").len() < 2 {
                fail::<()>(sink, "math requires at least 2 parts");
            }
            Some(CalcSpec::Math {
                operator: operator?,
                parts,
            })
        }
        CalcKind::Concat => {
            let parts = parse_parts(calc, sink);
            if calc.all("part").is_empty() {
                fail::<()>(sink, "concat requires at least 1 part");
            }
            Some(CalcSpec::Concat {
                separator: optional(calc, "separator"),
                parts,
            })
        }
        CalcKind::Case => {
            let whens: Vec<_> = calc
                .all("when")
                .iter()
                .filter_map(|line| parse_when(line, sink))
                .collect();
            if calc.all("when").is_empty() {
                fail::<()>(sink, "case requires at least 1 when");
            }
            Some(CalcSpec::Case {
                whens,
                otherwise: optional(calc, "else"),
            })
        }
        CalcKind::AgeFromDate => {
            let field = required(kind, calc, "field", sink);
            let reference = required(kind, calc, "value", sink).and_then(|value| {
                if value.eq_ignore_ascii_case("today") {
                    Some(AgeReference::Today)
                } else if is_field_name(&value) {
                    Some(AgeReference::Field(value))
                } else {
                    fail(
                        sink,
                        &format!("age_from_date value must be 'today' or a FieldName, found '{value}'"),
                    )
                }
            });
            Some(CalcSpec::AgeFromDate {
                field: field?,
                reference: reference?,
            })
        }
        CalcKind::AgeAtDate => {
            let field = required(kind, calc, "field", sink);
            let value = required(kind, calc, "value", sink);
            Some(CalcSpec::AgeAtDate {
                field: field?,
                value: value?,
                separator: optional(calc, "separator"),
            })
        }
        CalcKind::DateOffset => {
            let field = required(kind, calc, "field", sink);
            let offset = required(kind, calc, "value", sink).and_then(|value| {
                value.parse::<DateOffset>().ok().or_else(|| {
                    fail(
                        sink,
                        &format!("date_offset value '{value}' must look like +28d or -1y"),
                    )
                })
            });
            Some(CalcSpec::DateOffset {
                field: field?,
                offset: offset?,
            })
        }
        CalcKind::DateDiff => {
            let field = required(kind, calc, "field", sink);
            let value = required(kind, calc, "value", sink);
            let unit = required(kind, calc, "unit", sink).and_then(|unit| {
                unit.parse::<DateUnit>().ok().or_else(|| {
                    fail(
                        sink,
                        &format!("date_diff unit '{unit}' must be d, w, m or y"),
                    )
                })
            });
            Some(CalcSpec::DateDiff {
                field: field?,
                value: value?,
                unit: unit?,
            })
        }
    }
}

fn required(
    kind: CalcKind,
    calc: &CalcLines<'_>,
    key: &str,
    sink: &mut IssueSink<'_>,
) -> Option<String> {
    match calc.get(key) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => fail(sink, &format!("{kind} requires {key}")),
    }
}

fn optional(calc: &CalcLines<'_>, key: &str) -> Option<String> {
    calc.get(key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn fail<T>(sink: &mut IssueSink<'_>, message: &str) -> Option<T> {
    sink.error(IssueKind::FieldFormat, Column::Responses, message);
    None
}

fn parse_parts(calc: &CalcLines<'_>, sink: &mut IssueSink<'_>) -> Vec<CalcPart> {
    calc.all("part")
        .iter()
        .filter_map(|line| parse_part(line, sink))
        .collect()
}

/// `part:<constant|lookup|query> <value>`
fn parse_part(line: &str, sink: &mut IssueSink<'_>) -> Option<CalcPart> {
    let Some((part_type, value)) = line.split_once(' ') else {
        return fail(sink, &format!("invalid part '{line}', expected 'type value'"));
    };
    let value = value.trim().to_string();
    match part_type.to_lowercase().as_str() {
        "constant" => Some(CalcPart::Constant(value)),
        "lookup" => Some(CalcPart::Lookup(value)),
        "query" => Some(CalcPart::Query(value)),
        other => fail(
            sink,
            &format!("invalid part type '{other}', expected constant, lookup or query"),
        ),
    }
}

/// `@name = fieldName`; the `@` is added when missing.
fn parse_param(line: &str, sink: &mut IssueSink<'_>) -> Option<QueryParam> {
    let Some(caps) = PARAM_REGEX.captures(line) else {
        return fail(
            sink,
            &format!("invalid param '{line}', expected '@name = fieldName'"),
        );
    };
    let name = &caps[1];
    let name = if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{name}")
    };
    Some(QueryParam {
        name,
        field: caps[2].to_string(),
    })
}

/// `<field> <op> <value> => <result>`
fn parse_when(line: &str, sink: &mut IssueSink<'_>) -> Option<CaseWhen> {
    let parsed = WHEN_REGEX.captures(line).and_then(|caps| {
        Some(CaseWhen {
            field: caps[1].to_string(),
            operator: FilterOperator::parse(&caps[2])?,
            value: caps[3].trim().to_string(),
            result: caps[4].trim().to_string(),
        })
    });
    parsed.or_else(|| {
        fail(
            sink,
            &format!("invalid when '{line}', expected 'field operator value => result'"),
        )
    })
}
