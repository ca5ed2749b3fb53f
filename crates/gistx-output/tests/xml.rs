//! Survey XML emitter tests.

use gistx_model::{
    CalcPart, CalcSpec, DateBound, DateOffset, DateUnit, DynamicResponses, DynamicSource,
    FieldType, FilterOperator, FilterValue, LogicCheck, MathOperator, Position, Question,
    QuestionType, RangeSpec, ResponseFilter, ResponseOption, ResponseSpec, SkipCondition,
    SkipPhase, SkipRule, SpecialResponse,
};
use gistx_output::{emit, verify_well_formed, write_xml};
use proptest::prelude::*;

fn sample_questions() -> Vec<Question> {
    let mut sex = Question::new(Position::new(2), "sex", QuestionType::Radio, FieldType::Integer);
    sex.question_text = "Sex?".into();
    sex.responses = Some(ResponseSpec::Static {
        entries: vec![ResponseOption::new("1", "Male"), ResponseOption::new("2", "Female")],
    });
    sex.dont_know = Some(true);
    sex.refuse = Some(false);
    sex.skip_rules.push(SkipRule {
        phase: SkipPhase::Post,
        check_field: "sex".into(),
        condition: SkipCondition::Eq,
        value: "1".into(),
        target_field: "bmi".into(),
    });

    let mut bmi = Question::new(
        Position::new(3),
        "bmi",
        QuestionType::Automatic,
        FieldType::TextDecimal,
    );
    bmi.calculation = Some(CalcSpec::Math {
        operator: MathOperator::Divide,
        parts: vec![CalcPart::Lookup("weight".into()), CalcPart::Constant("2".into())],
    });

    let mut visit = Question::new(Position::new(4), "visit_date", QuestionType::Date, FieldType::Date);
    visit.question_text = "Visit date".into();
    visit.range = Some(RangeSpec::Date {
        lower: DateBound::Relative(DateOffset {
            amount: -1,
            unit: DateUnit::Years,
        }),
        upper: DateBound::Zero,
    });
    visit.logic_checks.push(LogicCheck {
        expression: "visit_date > enrol_date".into(),
        message: "Visit before enrolment".into(),
        is_unique_check: false,
        referenced_fields: Default::default(),
    });

    vec![sex, bmi, visit]
}

#[test]
fn survey_document() {
    let xml = emit(&sample_questions()).unwrap();
    insta::assert_snapshot!(xml.trim_end(), @r#"
    <?xml version="1.0" encoding="utf-8"?>
    <survey>
    	<question type="radio" fieldname="sex" fieldtype="integer">
    		<text>Sex?</text>
    		<responses>
    			<response value="1" text="Male"/>
    			<response value="2" text="Female"/>
    		</responses>
    		<postskip>
    			<skip fieldname="sex" condition="=" response="1" response_type="fixed" skiptofieldname="bmi"/>
    		</postskip>
    		<dont_know>-7</dont_know>
    	</question>
    	<question type="automatic" fieldname="bmi" fieldtype="text_decimal">
    		<calculation type="math" operator="/">
    			<part type="lookup" field="weight"/>
    			<result type="constant" value="2"/>
    		</calculation>
    	</question>
    	<question type="date" fieldname="visit_date" fieldtype="date">
    		<text>Visit date</text>
    		<date_range>
    			<min_date>-1y</min_date>
    			<max_date>0</max_date>
    		</date_range>
    		<logic_check>visit_date &gt; enrol_date; Visit before enrolment</logic_check>
    	</question>
    	<question type="information" fieldname="end_of_questions" fieldtype="n/a">
    		<text>Press the 'Finish' button to save the data.</text>
    	</question>
    </survey>
    "#);
}

#[test]
fn dynamic_responses_keep_references() {
    let mut district = Question::new(
        Position::new(5),
        "district",
        QuestionType::Combobox,
        FieldType::Integer,
    );
    district.question_text = "District".into();
    district.responses = Some(ResponseSpec::Dynamic(DynamicResponses {
        source: DynamicSource::Csv {
            file: "districts.csv".into(),
        },
        filters: vec![ResponseFilter {
            field: "region_id".into(),
            operator: FilterOperator::Eq,
            value: FilterValue::Reference("region".into()),
        }],
        display: "name".into(),
        value: "id".into(),
        distinct: Some(true),
        empty_message: Some("No districts".into()),
        dont_know: Some(SpecialResponse {
            value: "-7".into(),
            label: Some("Unknown".into()),
        }),
        not_in_list: None,
    }));

    let xml = emit(&[district]).unwrap();
    assert!(xml.contains(r#"<responses source="csv" file="districts.csv">"#));
    assert!(xml.contains(r#"<filter column="region_id" operator="=" value="[[region]]"/>"#));
    assert!(xml.contains(r#"<display column="name"/>"#));
    assert!(xml.contains("<distinct>true</distinct>"));
    assert!(xml.contains(r#"<dont_know value="-7" label="Unknown"/>"#));
    assert!(!xml.contains("not_in_list"));
}

#[test]
fn markup_in_cells_is_escaped() {
    let mut q = Question::new(Position::new(2), "age", QuestionType::Text, FieldType::Integer);
    q.question_text = "Age <years> & months".into();
    q.skip_rules.push(SkipRule {
        phase: SkipPhase::Pre,
        check_field: "consent".into(),
        condition: SkipCondition::Lt,
        value: "1".into(),
        target_field: "end".into(),
    });
    let xml = emit(&[q]).unwrap();
    assert!(xml.contains("<text>Age &lt;years&gt; &amp; months</text>"));
    assert!(xml.contains(r#"condition="&lt;""#));
    verify_well_formed("age.xml", &xml).unwrap();
}

#[test]
fn unique_check_and_numeric_range() {
    let mut q = Question::new(Position::new(2), "hhid", QuestionType::Text, FieldType::TextInteger);
    q.question_text = "Household id".into();
    q.max_characters = Some(6);
    q.range = Some(RangeSpec::Numeric {
        lower: Some("1".into()),
        upper: Some("999999".into()),
    });
    q.logic_checks.push(LogicCheck::unique("Household already entered"));
    let xml = emit(&[q]).unwrap();
    assert!(xml.contains("<maxCharacters>6</maxCharacters>"));
    assert!(xml.contains("<unique_check>"));
    assert!(xml.contains("<message>Household already entered</message>"));
    assert!(xml.contains(
        r#"<values minvalue="1" maxvalue="999999" other_values="1" message="Number must be between 1 and 999999!"/>"#
    ));
    assert!(!xml.contains("<logic_check>"));
}

#[test]
fn open_ranges() {
    let mut age = Question::new(Position::new(2), "age", QuestionType::Text, FieldType::Integer);
    age.question_text = "Age?".into();
    age.range = Some(RangeSpec::Numeric {
        lower: Some("0".into()),
        upper: None,
    });
    let mut weight = Question::new(Position::new(3), "weight", QuestionType::Text, FieldType::Integer);
    weight.question_text = "Weight?".into();
    weight.range = Some(RangeSpec::Numeric {
        lower: None,
        upper: Some("250".into()),
    });

    let xml = emit(&[age]).unwrap();
    assert!(xml.contains(
        r#"<values minvalue="0" maxvalue="-9" other_values="0" message="Number must be between 0 and -9!"/>"#
    ));
    let xml = emit(&[weight]).unwrap();
    assert!(!xml.contains("<numeric_check>"));
}

#[test]
fn writes_file_named_after_worksheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_xml(dir.path(), "visit_dd", &sample_questions()).unwrap();
    assert_eq!(path.file_name().unwrap(), "visit.xml");
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, emit(&sample_questions()).unwrap());
}

fn arb_question() -> impl Strategy<Value = Question> {
    (
        "[a-z][a-z0-9_]{0,8}",
        prop::sample::select(vec![QuestionType::Text, QuestionType::Radio, QuestionType::Date]),
        "[ -~]{0,20}",
        prop::option::of(1u32..2000),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(name, question_type, text, max, flag)| {
            let mut q = Question::new(Position::new(2), name, question_type, FieldType::Text);
            q.question_text = text;
            q.max_characters = max;
            q.na = flag;
            q
        })
}

proptest! {
    #[test]
    fn emit_is_deterministic(questions in prop::collection::vec(arb_question(), 0..6)) {
        let first = emit(&questions).unwrap();
        let second = emit(&questions.clone()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(verify_well_formed("p.xml", &first).is_ok());
    }

    #[test]
    fn question_order_follows_input(questions in prop::collection::vec(arb_question(), 1..6)) {
        let xml = emit(&questions).unwrap();
        let mut cursor = 0;
        for q in &questions {
            let tag = format!("fieldname=\"{}\"", q.field_name);
            let found = xml[cursor..].find(&tag);
            prop_assert!(found.is_some());
            cursor += found.unwrap_or(0) + tag.len();
        }
        prop_assert!(xml[cursor..].contains("fieldname=\"end_of_questions\""));
    }
}
