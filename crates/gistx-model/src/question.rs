//! Validated questions and the QuestionType / FieldType vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calc::CalcSpec;
use crate::error::ModelError;
use crate::logic::LogicCheck;
use crate::position::Position;
use crate::range::RangeSpec;
use crate::response::ResponseSpec;
use crate::skip::SkipRule;

/// Automatic fields filled in by the survey application itself.
pub const BUILT_IN_AUTOMATIC_FIELDS: &[&str] = &[
    "starttime",
    "stoptime",
    "uniqueid",
    "swver",
    "survey_id",
    "lastmod",
];

/// Field name of the synthetic question appended to every form.
pub const END_OF_QUESTIONS: &str = "end_of_questions";

/// Returns true for the six automatic fields exempt from calculation parsing.
pub fn is_built_in_automatic(field_name: &str) -> bool {
    let lower = field_name.to_lowercase();
    BUILT_IN_AUTOMATIC_FIELDS.contains(&lower.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Radio,
    Combobox,
    Checkbox,
    Text,
    Date,
    Information,
    Automatic,
    Button,
}

impl QuestionType {
    pub const ALL: [QuestionType; 8] = [
        Self::Radio,
        Self::Combobox,
        Self::Checkbox,
        Self::Text,
        Self::Date,
        Self::Information,
        Self::Automatic,
        Self::Button,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radio => "radio",
            Self::Combobox => "combobox",
            Self::Checkbox => "checkbox",
            Self::Text => "text",
            Self::Date => "date",
            Self::Information => "information",
            Self::Automatic => "automatic",
            Self::Button => "button",
        }
    }

    /// Question types that present a list of responses.
    pub fn has_response_list(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox | Self::Combobox)
    }
}

impl FromStr for QuestionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| ModelError::UnknownQuestionType(s.to_string()))
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "datetime")]
    Datetime,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "phone_num")]
    PhoneNum,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "text_integer")]
    TextInteger,
    #[serde(rename = "text_decimal")]
    TextDecimal,
    #[serde(rename = "text_id")]
    TextId,
    #[serde(rename = "n/a")]
    NotApplicable,
    #[serde(rename = "hourmin")]
    HourMin,
}

impl FieldType {
    pub const ALL: [FieldType; 10] = [
        Self::Text,
        Self::Datetime,
        Self::Date,
        Self::PhoneNum,
        Self::Integer,
        Self::TextInteger,
        Self::TextDecimal,
        Self::TextId,
        Self::NotApplicable,
        Self::HourMin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Datetime => "datetime",
            Self::Date => "date",
            Self::PhoneNum => "phone_num",
            Self::Integer => "integer",
            Self::TextInteger => "text_integer",
            Self::TextDecimal => "text_decimal",
            Self::TextId => "text_id",
            Self::NotApplicable => "n/a",
            Self::HourMin => "hourmin",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }

    /// Field types stored as bounded strings.
    pub fn needs_max_characters(self) -> bool {
        matches!(self, Self::Text | Self::TextInteger | Self::PhoneNum)
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| ModelError::UnknownFieldType(s.to_string()))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MaxCharacters is required for bounded string fields unless the question
/// type supplies its own value (automatic, checkbox, combobox).
pub fn requires_max_characters(question_type: QuestionType, field_type: FieldType) -> bool {
    field_type.needs_max_characters()
        && !matches!(
            question_type,
            QuestionType::Automatic | QuestionType::Checkbox | QuestionType::Combobox
        )
}

/// A fully validated data dictionary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub position: Position,
    pub field_name: String,
    pub question_type: QuestionType,
    pub field_type: FieldType,
    pub question_text: String,
    pub max_characters: Option<u32>,
    pub responses: Option<ResponseSpec>,
    pub calculation: Option<CalcSpec>,
    pub range: Option<RangeSpec>,
    pub logic_checks: Vec<LogicCheck>,
    pub dont_know: Option<bool>,
    pub refuse: Option<bool>,
    pub na: Option<bool>,
    pub skip_rules: Vec<SkipRule>,
}

impl Question {
    /// Minimal question with every optional part empty.
    pub fn new(
        position: Position,
        field_name: impl Into<String>,
        question_type: QuestionType,
        field_type: FieldType,
    ) -> Self {
        Self {
            position,
            field_name: field_name.into(),
            question_type,
            field_type,
            question_text: String::new(),
            max_characters: None,
            responses: None,
            calculation: None,
            range: None,
            logic_checks: Vec::new(),
            dont_know: None,
            refuse: None,
            na: None,
            skip_rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_round_trips_through_str() {
        for qt in QuestionType::ALL {
            assert_eq!(qt.as_str().parse::<QuestionType>(), Ok(qt));
        }
        assert!("Radio".parse::<QuestionType>().is_err());
    }

    #[test]
    fn field_type_parses_na() {
        assert_eq!("n/a".parse::<FieldType>(), Ok(FieldType::NotApplicable));
        assert!("number".parse::<FieldType>().is_err());
    }

    #[test]
    fn max_characters_exemptions() {
        assert!(requires_max_characters(QuestionType::Text, FieldType::Text));
        assert!(requires_max_characters(QuestionType::Text, FieldType::PhoneNum));
        assert!(!requires_max_characters(QuestionType::Combobox, FieldType::Text));
        assert!(!requires_max_characters(QuestionType::Automatic, FieldType::TextInteger));
        assert!(!requires_max_characters(QuestionType::Radio, FieldType::Integer));
    }

    #[test]
    fn built_in_automatic_is_case_insensitive() {
        assert!(is_built_in_automatic("StartTime"));
        assert!(!is_built_in_automatic("age"));
    }
}
