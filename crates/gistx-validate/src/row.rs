//! Row validator: every column of one data dictionary row.

use gistx_ingest::RawRow;
use gistx_model::{
    CalcSpec, Column, FieldType, Issue, IssueKind, Position, Question, QuestionType, RangeSpec,
    ResponseSpec, is_built_in_automatic, requires_max_characters,
};
use tracing::debug;

use crate::collector::IssueSink;
use crate::parsers::{
    ResponsesMode, parse_calc, parse_date_range, parse_dynamic, parse_logic_checks, parse_mask,
    parse_numeric_range, parse_skip_rules, parse_static, responses_mode,
};
use crate::schema::{
    check_compatibility, check_field_name, parse_field_type, parse_flag, parse_max_characters,
    parse_question_type,
};

/// Outcome of validating one row.
///
/// `question` is present only when the row produced no errors; warnings may
/// accompany a validated question.
#[derive(Debug, Clone)]
pub struct RowReport {
    pub position: Position,
    pub field_name: String,
    pub question: Option<Question>,
    pub issues: Vec<Issue>,
}

impl RowReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }
}

/// Rows without a FieldName, or flagged as merged, hold section titles and
/// spacing rather than questions.
pub fn is_structural(row: &RawRow) -> bool {
    row.merged || row.trimmed(Column::FieldName).is_empty()
}

/// Validates every column of `row`, collecting all issues before deciding.
pub fn validate_row(worksheet: &str, row: &RawRow) -> RowReport {
    let field_name = row.trimmed(Column::FieldName);
    let mut sink = IssueSink::new(worksheet, row.position).with_field(field_name);

    check_field_name(field_name, &mut sink);
    let question_type = parse_question_type(row.trimmed(Column::QuestionType), &mut sink);
    let field_type = parse_field_type(row.trimmed(Column::FieldType), &mut sink);
    if let (Some(question_type), Some(field_type)) = (question_type, field_type) {
        check_compatibility(question_type, field_type, &mut sink);
    }

    let question_text = row.trimmed(Column::QuestionText);
    if question_text.is_empty() && question_type != Some(QuestionType::Automatic) {
        sink.error(
            IssueKind::FieldFormat,
            Column::QuestionText,
            "QuestionText is required unless QuestionType is automatic",
        );
    }

    let max_characters = match row.trimmed(Column::MaxCharacters) {
        "" => {
            if let (Some(question_type), Some(field_type)) = (question_type, field_type)
                && requires_max_characters(question_type, field_type)
            {
                sink.error(
                    IssueKind::FieldFormat,
                    Column::MaxCharacters,
                    format!("MaxCharacters is required for {question_type} {field_type} fields"),
                );
            }
            None
        }
        text => parse_max_characters(text, &mut sink),
    };

    let (responses, calculation) =
        parse_responses_cell(row.cell(Column::Responses), field_name, question_type, &mut sink);

    let range = parse_range(
        row.trimmed(Column::LowerRange),
        row.trimmed(Column::UpperRange),
        question_type,
        field_type,
        &mut sink,
    );

    let logic_checks = parse_logic_checks(row.cell(Column::LogicCheck), &mut sink);
    let dont_know = parse_flag(row.trimmed(Column::DontKnow), Column::DontKnow, &mut sink);
    let refuse = parse_flag(row.trimmed(Column::Refuse), Column::Refuse, &mut sink);
    let na = parse_flag(row.trimmed(Column::Na), Column::Na, &mut sink);
    let skip_rules = parse_skip_rules(row.cell(Column::Skip), &mut sink);

    let question = match (question_type, field_type, logic_checks, skip_rules) {
        (Some(question_type), Some(field_type), Some(logic_checks), Some(skip_rules))
            if !sink.has_errors() =>
        {
            Some(Question {
                question_text: question_text.to_string(),
                max_characters,
                responses,
                calculation,
                range,
                logic_checks,
                dont_know,
                refuse,
                na,
                skip_rules,
                ..Question::new(row.position, field_name, question_type, field_type)
            })
        }
        _ => None,
    };

    let issues = sink.into_issues();
    debug!(
        row = row.position.row(),
        field = field_name,
        issues = issues.len(),
        valid = question.is_some(),
        "validated row"
    );
    RowReport {
        position: row.position,
        field_name: field_name.to_string(),
        question,
        issues,
    }
}

/// Dispatches the Responses cell on its first line.
fn parse_responses_cell(
    text: &str,
    field_name: &str,
    question_type: Option<QuestionType>,
    sink: &mut IssueSink<'_>,
) -> (Option<ResponseSpec>, Option<CalcSpec>) {
    let has_list = question_type.is_some_and(QuestionType::has_response_list);
    match responses_mode(text) {
        ResponsesMode::Empty => (None, None),
        ResponsesMode::Calc => match question_type {
            Some(QuestionType::Automatic) if is_built_in_automatic(field_name) => (None, None),
            Some(QuestionType::Automatic) => (None, parse_calc(text, sink)),
            Some(_) => {
                sink.error(
                    IssueKind::Compatibility,
                    Column::Responses,
                    "calculation given but QuestionType is not automatic",
                );
                (None, None)
            }
            None => (None, None),
        },
        ResponsesMode::Mask => match question_type {
            Some(QuestionType::Text) => (parse_mask(text, sink), None),
            Some(_) => {
                sink.error(
                    IssueKind::Compatibility,
                    Column::Responses,
                    "mask given but QuestionType is not text",
                );
                (None, None)
            }
            None => (None, None),
        },
        ResponsesMode::Dynamic => {
            let spec = parse_dynamic(text, sink);
            if let Some(question_type) = question_type
                && !has_list
            {
                sink.error(
                    IssueKind::Compatibility,
                    Column::Responses,
                    format!(
                        "dynamic responses need a radio, checkbox or combobox question, not {question_type}"
                    ),
                );
            }
            (spec, None)
        }
        ResponsesMode::Static => match question_type {
            Some(question_type) if has_list => (parse_static(text, question_type, sink), None),
            Some(question_type) => {
                sink.warning(
                    IssueKind::Compatibility,
                    Column::Responses,
                    format!("responses are ignored for {question_type} questions"),
                );
                (None, None)
            }
            None => (None, None),
        },
    }
}

/// Date rules apply to date fields and date questions; everything else is
/// numeric.
fn parse_range(
    lower: &str,
    upper: &str,
    question_type: Option<QuestionType>,
    field_type: Option<FieldType>,
    sink: &mut IssueSink<'_>,
) -> Option<RangeSpec> {
    let date_question = question_type == Some(QuestionType::Date);
    if date_question || field_type.is_some_and(FieldType::is_date) {
        parse_date_range(lower, upper, date_question, sink)
    } else {
        parse_numeric_range(lower, upper, sink)
    }
}
