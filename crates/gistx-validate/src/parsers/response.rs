//! Responses cell: static lists, dynamic sources and input masks.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use gistx_model::{
    Column, DynamicResponses, DynamicSource, FilterOperator, FilterValue, IssueKind, QuestionType,
    ResponseFilter, ResponseOption, ResponseSpec, SpecialResponse,
};
use regex::Regex;

use crate::collector::{Checkpoint, IssueSink};
use crate::grammar::{cell_lines, split_key_value};

static FILTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s*(!=|<>|>=|<=|=|>|<)\s*(.+)$").expect("Invalid filter regex")
});

static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[(\w+)\]\]$").expect("Invalid reference regex"));

const DYNAMIC_KEYS: [&str; 10] = [
    "source",
    "file",
    "table",
    "filter",
    "display",
    "value",
    "distinct",
    "empty_message",
    "dont_know",
    "not_in_list",
];

/// What the Responses cell holds, judged by its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsesMode {
    Empty,
    Static,
    Dynamic,
    Mask,
    Calc,
}

pub fn responses_mode(text: &str) -> ResponsesMode {
    let Some(first) = cell_lines(text).next() else {
        return ResponsesMode::Empty;
    };
    let first = first.to_lowercase();
    if first.starts_with("source:") {
        ResponsesMode::Dynamic
    } else if first.starts_with("calc:") {
        ResponsesMode::Calc
    } else if first.starts_with("mask:") {
        ResponsesMode::Mask
    } else {
        ResponsesMode::Static
    }
}

/// Parses `value:label` lines. Radio and checkbox lists are held to the
/// strict spacing rules; combobox lists only need one colon per line.
pub fn parse_static(
    text: &str,
    question_type: QuestionType,
    sink: &mut IssueSink<'_>,
) -> Option<ResponseSpec> {
    let strict = matches!(question_type, QuestionType::Radio | QuestionType::Checkbox);
    let mark = Checkpoint::new(sink);
    let mut entries = Vec::new();
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();

    for line in text.split(['\n', '\r']).filter(|l| !l.trim().is_empty()) {
        if line.matches(':').count() != 1 {
            sink.error(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("expected 'value:label', found '{}'", line.trim()),
            );
            continue;
        }
        let Some((raw_value, raw_label)) = line.split_once(':') else {
            continue;
        };

        if strict {
            if line.starts_with(char::is_whitespace) {
                sink.error(
                    IssueKind::FieldFormat,
                    Column::Responses,
                    format!("remove leading spaces in '{}'", line.trim()),
                );
            }
            if raw_value.ends_with(char::is_whitespace) {
                sink.error(
                    IssueKind::FieldFormat,
                    Column::Responses,
                    format!("remove space before the colon in '{}'", line.trim()),
                );
            }
            if raw_label.starts_with(char::is_whitespace) {
                sink.error(
                    IssueKind::FieldFormat,
                    Column::Responses,
                    format!("remove space after the colon in '{}'", line.trim()),
                );
            }
        }

        let value = raw_value.trim();
        if value.is_empty() {
            sink.error(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("response value is empty in '{}'", line.trim()),
            );
            continue;
        }
        if !seen.insert(value.to_string()) {
            if reported.insert(value.to_string()) {
                sink.error(
                    IssueKind::Duplicate,
                    Column::Responses,
                    format!("duplicate response value '{value}'"),
                );
            }
            continue;
        }
        entries.push(ResponseOption::new(value, raw_label.trim()));
    }

    mark.clean(sink)
        .then_some(ResponseSpec::Static { entries })
}

/// Parses a `source:csv|database` block of `key:value` lines.
pub fn parse_dynamic(text: &str, sink: &mut IssueSink<'_>) -> Option<ResponseSpec> {
    let mark = Checkpoint::new(sink);
    let mut source_kind: Option<String> = None;
    let mut file = None;
    let mut table = None;
    let mut filters = Vec::new();
    let mut display = None;
    let mut value = None;
    let mut distinct = None;
    let mut empty_message = None;
    let mut dont_know = None;
    let mut not_in_list = None;

    for line in cell_lines(text) {
        let Some((key, val)) = split_key_value(line) else {
            sink.error(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("expected 'key:value', found '{line}'"),
            );
            continue;
        };
        if !DYNAMIC_KEYS.contains(&key.as_str()) {
            sink.error(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("unrecognized dynamic response key '{key}'"),
            );
            continue;
        }
        if val.is_empty() {
            sink.error(
                IssueKind::FieldFormat,
                Column::Responses,
                format!("dynamic response key '{key}' has no value"),
            );
            continue;
        }
        match key.as_str() {
            "source" => {
                let lowered = val.to_lowercase();
                if lowered == "csv" || lowered == "database" {
                    source_kind = Some(lowered);
                } else {
                    sink.error(
                        IssueKind::FieldFormat,
                        Column::Responses,
                        format!("source must be 'csv' or 'database', found '{val}'"),
                    );
                }
            }
            "file" => file = Some(val.to_string()),
            "table" => table = Some(val.to_string()),
            "filter" => {
                if let Some(filter) = parse_filter(val) {
                    filters.push(filter);
                } else {
                    sink.error(
                        IssueKind::FieldFormat,
                        Column::Responses,
                        format!("invalid filter '{val}', expected 'field operator value'"),
                    );
                }
            }
            "display" => display = Some(val.to_string()),
            "value" => value = Some(val.to_string()),
            "distinct" => match val.to_lowercase().as_str() {
                "true" => distinct = Some(true),
                "false" => distinct = Some(false),
                _ => sink.error(
                    IssueKind::FieldFormat,
                    Column::Responses,
                    format!("distinct must be 'true' or 'false', found '{val}'"),
                ),
            },
            "empty_message" => empty_message = Some(val.to_string()),
            "dont_know" => dont_know = Some(special_response(val)),
            "not_in_list" => not_in_list = Some(special_response(val)),
            _ => {}
        }
    }

    let source = match source_kind.as_deref() {
        Some("csv") => {
            if table.is_some() {
                sink.warning(
                    IssueKind::FieldFormat,
                    Column::Responses,
                    "table is ignored for csv sources",
                );
            }
            file.map(|file| DynamicSource::Csv { file })
                .or_else(|| missing(sink, "csv sources require file"))
        }
        Some(_) => {
            if file.is_some() {
                sink.warning(
                    IssueKind::FieldFormat,
                    Column::Responses,
                    "file is ignored for database sources",
                );
            }
            table
                .map(|table| DynamicSource::Database { table })
                .or_else(|| missing(sink, "database sources require table"))
        }
        None => None,
    };
    let display = display.or_else(|| missing(sink, "dynamic responses require display"));
    let value = value.or_else(|| missing(sink, "dynamic responses require value"));

    if !mark.clean(sink) {
        return None;
    }
    Some(ResponseSpec::Dynamic(DynamicResponses {
        source: source?,
        filters,
        display: display?,
        value: value?,
        distinct,
        empty_message,
        dont_know,
        not_in_list,
    }))
}

/// Parses `mask:<pattern>`.
pub fn parse_mask(text: &str, sink: &mut IssueSink<'_>) -> Option<ResponseSpec> {
    let mut lines = cell_lines(text);
    let pattern = lines
        .next()
        .and_then(split_key_value)
        .map(|(_, pattern)| pattern.to_string())
        .unwrap_or_default();
    if lines.next().is_some() {
        sink.warning(
            IssueKind::FieldFormat,
            Column::Responses,
            "lines after the mask pattern are ignored",
        );
    }
    if pattern.is_empty() {
        sink.error(IssueKind::FieldFormat, Column::Responses, "mask pattern is empty");
        return None;
    }
    Some(ResponseSpec::Mask { pattern })
}

fn parse_filter(text: &str) -> Option<ResponseFilter> {
    let caps = FILTER_REGEX.captures(text)?;
    let operator = FilterOperator::parse(&caps[2])?;
    let raw = caps[3].trim();
    let value = match REFERENCE_REGEX.captures(raw) {
        Some(reference) => FilterValue::Reference(reference[1].to_string()),
        None => FilterValue::Literal(raw.to_string()),
    };
    Some(ResponseFilter {
        field: caps[1].to_string(),
        operator,
        value,
    })
}

fn special_response(text: &str) -> SpecialResponse {
    match text.split_once(',') {
        Some((value, label)) => SpecialResponse {
            value: value.trim().to_string(),
            label: Some(label.trim().to_string()).filter(|l| !l.is_empty()),
        },
        None => SpecialResponse {
            value: text.trim().to_string(),
            label: None,
        },
    }
}

fn missing<T>(sink: &mut IssueSink<'_>, message: &str) -> Option<T> {
    sink.error(IssueKind::FieldFormat, Column::Responses, message);
    None
}
