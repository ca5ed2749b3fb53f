//! Survey XML emitter.
//!
//! One document per questionnaire worksheet. The output is a pure function of
//! the validated questions: question order follows row order, and a closing
//! `end_of_questions` information question is always appended.

use std::io::Write;
use std::path::{Path, PathBuf};

use gistx_ingest::questionnaire_stem;
use gistx_model::{
    CalcPart, CalcSpec, DynamicResponses, END_OF_QUESTIONS, FieldType, Question, QuestionType,
    RangeSpec, ResponseSpec, SkipPhase, SkipRule, SpecialResponse,
};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::error::{OutputError, Result};

const END_OF_QUESTIONS_TEXT: &str = "Press the 'Finish' button to save the data.";

/// Missing-value codes written for the DontKnow / Refuse / NA buttons.
const DONT_KNOW_CODE: &str = "-7";
const REFUSE_CODE: &str = "-8";
const NA_CODE: &str = "-6";

/// Written for an open upper bound.
const MISSING_BOUND: &str = "-9";

/// `visit_dd` and `visit_xml` both become `visit.xml`.
pub fn xml_file_name(worksheet: &str) -> String {
    let stem = questionnaire_stem(worksheet).unwrap_or(worksheet);
    format!("{stem}.xml")
}

/// Serializes the questions of one worksheet.
pub fn emit(questions: &[Question]) -> Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b'\t', 1);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    xml.write_event(Event::Start(BytesStart::new("survey")))?;

    for question in questions {
        write_question(&mut xml, question)?;
    }
    write_end_of_questions(&mut xml)?;

    xml.write_event(Event::End(BytesEnd::new("survey")))?;
    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Emits, re-parses and writes `<dir>/<stem>.xml`.
pub fn write_xml(dir: &Path, worksheet: &str, questions: &[Question]) -> Result<PathBuf> {
    let file_name = xml_file_name(worksheet);
    let content = emit(questions)?;
    verify_well_formed(&file_name, &content)?;

    let path = dir.join(&file_name);
    std::fs::write(&path, content.as_bytes()).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), questions = questions.len(), "wrote survey XML");
    Ok(path)
}

/// Parses `content` to the end and checks that every element is closed.
pub fn verify_well_formed(file_name: &str, content: &str) -> Result<()> {
    let malformed = |message: String| OutputError::MalformedXml {
        file: file_name.to_string(),
        message,
    };
    let mut reader = Reader::from_str(content);
    let mut depth = 0usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(malformed(format!(
                    "{err} at byte {}",
                    reader.buffer_position()
                )));
            }
        }
    }
    if depth != 0 {
        return Err(malformed(format!("{depth} element(s) left open")));
    }
    Ok(())
}

fn write_question<W: Write>(xml: &mut Writer<W>, question: &Question) -> Result<()> {
    let mut start = BytesStart::new("question");
    start.push_attribute(("type", question.question_type.as_str()));
    start.push_attribute(("fieldname", question.field_name.as_str()));
    start.push_attribute(("fieldtype", question.field_type.as_str()));
    xml.write_event(Event::Start(start))?;

    if question.question_type != QuestionType::Automatic {
        write_text_element(xml, "text", &question.question_text)?;
    }
    if question.question_type == QuestionType::Automatic
        && let Some(calculation) = &question.calculation
    {
        write_calculation(xml, calculation)?;
    }
    if let Some(max) = question.max_characters {
        write_text_element(xml, "maxCharacters", &max.to_string())?;
    }
    if let Some(ResponseSpec::Mask { pattern }) = &question.responses {
        write_empty(xml, "mask", &[("value", pattern.as_str())])?;
    }
    for check in question.logic_checks.iter().filter(|c| c.is_unique_check) {
        xml.write_event(Event::Start(BytesStart::new("unique_check")))?;
        write_text_element(xml, "message", &check.message)?;
        xml.write_event(Event::End(BytesEnd::new("unique_check")))?;
    }
    if let Some(range) = &question.range {
        write_range(xml, range)?;
    }
    for check in question.logic_checks.iter().filter(|c| !c.is_unique_check) {
        let text = format!("{}; {}", check.expression, check.message);
        write_text_element(xml, "logic_check", &text)?;
    }
    match &question.responses {
        Some(ResponseSpec::Static { entries }) => {
            xml.write_event(Event::Start(BytesStart::new("responses")))?;
            for entry in entries {
                write_empty(
                    xml,
                    "response",
                    &[("value", entry.value.as_str()), ("text", entry.label.as_str())],
                )?;
            }
            xml.write_event(Event::End(BytesEnd::new("responses")))?;
        }
        Some(ResponseSpec::Dynamic(dynamic)) => write_dynamic_responses(xml, dynamic)?,
        Some(ResponseSpec::Mask { .. }) | None => {}
    }
    write_skips(xml, SkipPhase::Pre, &question.skip_rules)?;
    write_skips(xml, SkipPhase::Post, &question.skip_rules)?;

    for (flag, element, code) in [
        (question.dont_know, "dont_know", DONT_KNOW_CODE),
        (question.refuse, "refuse", REFUSE_CODE),
        (question.na, "na", NA_CODE),
    ] {
        if flag == Some(true) {
            write_text_element(xml, element, code)?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new("question")))?;
    Ok(())
}

fn write_end_of_questions<W: Write>(xml: &mut Writer<W>) -> Result<()> {
    let mut start = BytesStart::new("question");
    start.push_attribute(("type", QuestionType::Information.as_str()));
    start.push_attribute(("fieldname", END_OF_QUESTIONS));
    start.push_attribute(("fieldtype", FieldType::NotApplicable.as_str()));
    xml.write_event(Event::Start(start))?;
    write_text_element(xml, "text", END_OF_QUESTIONS_TEXT)?;
    xml.write_event(Event::End(BytesEnd::new("question")))?;
    Ok(())
}

fn write_range<W: Write>(xml: &mut Writer<W>, range: &RangeSpec) -> Result<()> {
    match range {
        RangeSpec::Numeric {
            lower: Some(lower),
            upper,
        } => {
            let upper = upper.as_deref().unwrap_or(MISSING_BOUND);
            let message = format!("Number must be between {lower} and {upper}!");
            xml.write_event(Event::Start(BytesStart::new("numeric_check")))?;
            write_empty(
                xml,
                "values",
                &[
                    ("minvalue", lower.as_str()),
                    ("maxvalue", upper),
                    ("other_values", lower.as_str()),
                    ("message", message.as_str()),
                ],
            )?;
            xml.write_event(Event::End(BytesEnd::new("numeric_check")))?;
        }
        RangeSpec::Numeric { .. } => {}
        RangeSpec::Date { lower, upper } => {
            xml.write_event(Event::Start(BytesStart::new("date_range")))?;
            write_text_element(xml, "min_date", &lower.to_string())?;
            write_text_element(xml, "max_date", &upper.to_string())?;
            xml.write_event(Event::End(BytesEnd::new("date_range")))?;
        }
    }
    Ok(())
}

fn write_dynamic_responses<W: Write>(
    xml: &mut Writer<W>,
    dynamic: &DynamicResponses,
) -> Result<()> {
    let (locator_key, locator) = dynamic.source.locator();
    let mut start = BytesStart::new("responses");
    start.push_attribute(("source", dynamic.source.kind()));
    start.push_attribute((locator_key, locator));
    xml.write_event(Event::Start(start))?;

    for filter in &dynamic.filters {
        let value = filter.value.as_written();
        write_empty(
            xml,
            "filter",
            &[
                ("column", filter.field.as_str()),
                ("operator", filter.operator.as_str()),
                ("value", value.as_str()),
            ],
        )?;
    }
    write_empty(xml, "display", &[("column", dynamic.display.as_str())])?;
    write_empty(xml, "value", &[("column", dynamic.value.as_str())])?;
    if let Some(distinct) = dynamic.distinct {
        write_text_element(xml, "distinct", if distinct { "true" } else { "false" })?;
    }
    if let Some(message) = &dynamic.empty_message {
        write_text_element(xml, "empty_message", message)?;
    }
    if let Some(special) = &dynamic.dont_know {
        write_special(xml, "dont_know", special)?;
    }
    if let Some(special) = &dynamic.not_in_list {
        write_special(xml, "not_in_list", special)?;
    }

    xml.write_event(Event::End(BytesEnd::new("responses")))?;
    Ok(())
}

fn write_special<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    special: &SpecialResponse,
) -> Result<()> {
    match &special.label {
        Some(label) => write_empty(
            xml,
            name,
            &[("value", special.value.as_str()), ("label", label.as_str())],
        ),
        None => write_empty(xml, name, &[("value", special.value.as_str())]),
    }
}

fn write_skips<W: Write>(xml: &mut Writer<W>, phase: SkipPhase, rules: &[SkipRule]) -> Result<()> {
    let mut rules = rules.iter().filter(|rule| rule.phase == phase).peekable();
    if rules.peek().is_none() {
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new(phase.element())))?;
    for rule in rules {
        write_empty(
            xml,
            "skip",
            &[
                ("fieldname", rule.check_field.as_str()),
                ("condition", rule.condition.as_xml()),
                ("response", rule.value.as_str()),
                ("response_type", "fixed"),
                ("skiptofieldname", rule.target_field.as_str()),
            ],
        )?;
    }
    xml.write_event(Event::End(BytesEnd::new(phase.element())))?;
    Ok(())
}

fn write_calculation<W: Write>(xml: &mut Writer<W>, calculation: &CalcSpec) -> Result<()> {
    let kind = calculation.kind().as_str();
    let mut start = BytesStart::new("calculation");
    start.push_attribute(("type", kind));

    match calculation {
        CalcSpec::Constant { value } => {
            start.push_attribute(("value", value.as_str()));
            xml.write_event(Event::Empty(start))?;
        }
        CalcSpec::Lookup { field } => {
            start.push_attribute(("field", field.as_str()));
            xml.write_event(Event::Empty(start))?;
        }
        CalcSpec::Query { sql, params } => {
            xml.write_event(Event::Start(start))?;
            write_text_element(xml, "sql", sql)?;
            for param in params {
                write_empty(
                    xml,
                    "parameter",
                    &[("name", param.name.as_str()), ("field", param.field.as_str())],
                )?;
            }
            xml.write_event(Event::End(BytesEnd::new("calculation")))?;
        }
        CalcSpec::Math { operator, parts } => {
            start.push_attribute(("operator", operator.as_str()));
            xml.write_event(Event::Start(start))?;
            for part in parts {
                write_calc_part(xml, part)?;
            }
            xml.write_event(Event::End(BytesEnd::new("calculation")))?;
        }
        CalcSpec::Concat { separator, parts } => {
            if let Some(separator) = separator {
                start.push_attribute(("separator", separator.as_str()));
            }
            xml.write_event(Event::Start(start))?;
            for part in parts {
                write_calc_part(xml, part)?;
            }
            xml.write_event(Event::End(BytesEnd::new("calculation")))?;
        }
        CalcSpec::Case { whens, otherwise } => {
            xml.write_event(Event::Start(start))?;
            for when in whens {
                let mut branch = BytesStart::new("when");
                branch.push_attribute(("field", when.field.as_str()));
                branch.push_attribute(("operator", when.operator.as_str()));
                branch.push_attribute(("value", when.value.as_str()));
                xml.write_event(Event::Start(branch))?;
                write_constant_result(xml, &when.result)?;
                xml.write_event(Event::End(BytesEnd::new("when")))?;
            }
            if let Some(otherwise) = otherwise {
                xml.write_event(Event::Start(BytesStart::new("else")))?;
                write_constant_result(xml, otherwise)?;
                xml.write_event(Event::End(BytesEnd::new("else")))?;
            }
            xml.write_event(Event::End(BytesEnd::new("calculation")))?;
        }
        CalcSpec::AgeFromDate { field, reference } => {
            start.push_attribute(("field", field.as_str()));
            start.push_attribute(("value", reference.as_str()));
            xml.write_event(Event::Empty(start))?;
        }
        CalcSpec::AgeAtDate {
            field,
            value,
            separator,
        } => {
            start.push_attribute(("field", field.as_str()));
            start.push_attribute(("value", value.as_str()));
            if let Some(separator) = separator {
                start.push_attribute(("separator", separator.as_str()));
            }
            xml.write_event(Event::Empty(start))?;
        }
        CalcSpec::DateOffset { field, offset } => {
            let value = offset.to_string();
            start.push_attribute(("field", field.as_str()));
            start.push_attribute(("value", value.as_str()));
            xml.write_event(Event::Empty(start))?;
        }
        CalcSpec::DateDiff { field, value, unit } => {
            let unit = unit.as_char().to_string();
            start.push_attribute(("field", field.as_str()));
            start.push_attribute(("value", value.as_str()));
            start.push_attribute(("unit", unit.as_str()));
            xml.write_event(Event::Empty(start))?;
        }
    }
    Ok(())
}

/// Constant parts are written as `<result>`, matching the survey app's reader.
fn write_calc_part<W: Write>(xml: &mut Writer<W>, part: &CalcPart) -> Result<()> {
    match part {
        CalcPart::Constant(value) => write_constant_result(xml, value),
        CalcPart::Lookup(field) => write_empty(
            xml,
            "part",
            &[("type", part.type_name()), ("field", field.as_str())],
        ),
        CalcPart::Query(sql) => {
            let mut start = BytesStart::new("part");
            start.push_attribute(("type", part.type_name()));
            xml.write_event(Event::Start(start))?;
            write_text_element(xml, "sql", sql)?;
            xml.write_event(Event::End(BytesEnd::new("part")))?;
            Ok(())
        }
    }
}

fn write_constant_result<W: Write>(xml: &mut Writer<W>, value: &str) -> Result<()> {
    write_empty(xml, "result", &[("type", "constant"), ("value", value)])
}

/// Text content only escapes `<`, `>` and `&`; quotes stay readable.
fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_empty<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<()> {
    let mut element = BytesStart::new(name);
    for &attribute in attributes {
        element.push_attribute(attribute);
    }
    xml.write_event(Event::Empty(element))?;
    Ok(())
}
