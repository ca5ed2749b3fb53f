//! End-to-end worksheet validation scenarios.

use gistx_ingest::Worksheet;
use gistx_model::{Column, Issue, IssueKind, RangeSpec, ResponseSpec};
use gistx_validate::{WorksheetReport, validate_worksheet};

fn sheet(rows: &[&[&str]]) -> Worksheet {
    let header: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
    let mut all: Vec<Vec<&str>> = vec![header];
    all.extend(rows.iter().map(|r| r.to_vec()));
    Worksheet::from_rows("visit_dd", all)
}

fn errors(report: &WorksheetReport) -> Vec<&Issue> {
    report.issues().filter(|i| i.is_error()).collect()
}

#[test]
fn radio_with_text_field_type() {
    let report = validate_worksheet(&sheet(&[&["age", "radio", "text", "Age?", "10", "1:Yes"]]));
    let errors = errors(&report);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, IssueKind::Compatibility);
    assert_eq!(errors[0].message, "radio requires fieldType=integer");
    assert_eq!(errors[0].row, Some(2));
    assert_eq!(errors[0].field.as_deref(), Some("age"));
}

#[test]
fn duplicate_checkbox_value() {
    let report = validate_worksheet(&sheet(&[&[
        "symptoms",
        "checkbox",
        "text",
        "Symptoms?",
        "",
        "1:Yes\n2:No\n1:Maybe",
    ]]));
    let errors = errors(&report);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, IssueKind::Duplicate);
    assert!(errors[0].message.contains("'1'"));
}

#[test]
fn unique_checkbox_values_pass() {
    let report = validate_worksheet(&sheet(&[&[
        "symptoms",
        "checkbox",
        "text",
        "Symptoms?",
        "",
        "1:Cough\n2:Fever\n3:Rash",
    ]]));
    assert!(!report.has_errors());
    let questions = report.questions().unwrap();
    let Some(ResponseSpec::Static { entries }) = &questions[0].responses else {
        panic!("expected static responses");
    };
    assert_eq!(entries.len(), 3);
}

#[test]
fn skip_target_defined_before_owner() {
    let report = validate_worksheet(&sheet(&[
        &["comments", "text", "text", "Comments", "200"],
        &["age", "text", "integer", "Age?"],
        &[
            "smoker",
            "radio",
            "integer",
            "Smoker?",
            "",
            "1:Yes\n0:No",
            "",
            "",
            "",
            "",
            "",
            "",
            "preskip: if age < 18, skip to comments",
        ],
    ]));
    let errors = errors(&report);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, IssueKind::Reference);
    assert_eq!(
        errors[0].message,
        "targetfield comments must appear after current row"
    );
}

#[test]
fn math_with_one_part() {
    let report = validate_worksheet(&sheet(&[
        &["age1", "text", "integer", "Age?"],
        &[
            "total",
            "automatic",
            "integer",
            "",
            "",
            "calc:math\noperator:+\npart:lookup age1",
        ],
    ]));
    let errors = errors(&report);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, IssueKind::FieldFormat);
    assert_eq!(errors[0].message, "math requires at least 2 parts");
}

#[test]
fn logic_reference_ordering() {
    let logic = |expr: &str| -> Vec<String> {
        let cell = format!("{expr}; 'bad value'");
        let report = validate_worksheet(&sheet(&[
            &["height", "text", "integer", "Height?"],
            &["weight", "text", "integer", "Weight?", "", "", "", "", cell.as_str()],
            &["bmi", "text", "integer", "BMI?"],
        ]));
        errors(&report).iter().map(|i| i.message.clone()).collect()
    };

    assert!(logic("height > 100").is_empty());
    assert_eq!(
        logic("bmi < 40"),
        vec!["LogicCheck field bmi must appear before current row (found at row 4)"]
    );
    assert_eq!(
        logic("weight > 0"),
        vec!["LogicCheck field weight must appear before current row (found at row 3)"]
    );
}

#[test]
fn reports_all_issues_in_one_pass() {
    let report = validate_worksheet(&sheet(&[
        &["Age", "radio", "text", "Age?", "5"],
        &["age2", "text", "text", ""],
        &["age2", "text", "integer", "Again?"],
    ]));
    let kinds: Vec<_> = errors(&report).iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::FieldFormat,
            IssueKind::Compatibility,
            IssueKind::FieldFormat,
            IssueKind::FieldFormat,
            IssueKind::Duplicate,
        ]
    );
    assert!(report.questions().is_none());
}

#[test]
fn merged_and_blank_rows_are_skipped() {
    let header: Vec<String> = Column::ALL.iter().map(|c| c.name().to_string()).collect();
    let mut ws = Worksheet::from_rows("visit_dd", vec![header]);
    let section = gistx_ingest::RawRow::new(2, vec!["Section A".to_string()]).merged();
    let blank = gistx_ingest::RawRow::new(3, vec![String::new(); 14]);
    let question = gistx_ingest::RawRow::new(
        4,
        ["age", "text", "integer", "Age?"].map(String::from).to_vec(),
    );
    ws.rows.extend([section, blank, question]);

    let report = validate_worksheet(&ws);
    assert!(!report.has_errors());
    assert_eq!(report.questions().unwrap()[0].field_name, "age");
}

#[test]
fn issue_lines_locate_the_cell() {
    let report = validate_worksheet(&sheet(&[
        &["Age", "radio", "text", "Age?", "5"],
        &["age2", "text", "text", ""],
        &["age2", "text", "integer", "Again?"],
    ]));
    let lines: Vec<String> = errors(&report).iter().map(|i| i.to_string()).collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    ERROR - FieldFormatError: worksheet 'visit_dd', row 2, column FieldName, FieldName 'Age': FieldName 'Age' is not all lowercase
    ERROR - CompatibilityError: worksheet 'visit_dd', row 2, column FieldType, FieldName 'Age': radio requires fieldType=integer
    ERROR - FieldFormatError: worksheet 'visit_dd', row 3, column QuestionText, FieldName 'age2': QuestionText is required unless QuestionType is automatic
    ERROR - FieldFormatError: worksheet 'visit_dd', row 3, column MaxCharacters, FieldName 'age2': MaxCharacters is required for text text fields
    ERROR - DuplicateError: worksheet 'visit_dd', row 4, column FieldName, FieldName 'age2': duplicate FieldName 'age2' (first defined at row 3)
    ");
}

#[test]
fn one_sided_numeric_ranges_pass() {
    let report = validate_worksheet(&sheet(&[
        &["age", "text", "integer", "Age?", "", "", "0", ""],
        &["weight", "text", "integer", "Weight?", "", "", "", "250"],
    ]));
    assert!(!report.has_errors(), "{:?}", errors(&report));
    let questions = report.questions().unwrap();
    assert_eq!(
        questions[0].range,
        Some(RangeSpec::Numeric {
            lower: Some("0".into()),
            upper: None
        })
    );
    assert_eq!(
        questions[1].range,
        Some(RangeSpec::Numeric {
            lower: None,
            upper: Some("250".into())
        })
    );
}
