//! Response lists: static value/label pairs, dynamic CSV/database sources, input masks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three response modes, selected by the first line of the Responses cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResponseSpec {
    Static { entries: Vec<ResponseOption> },
    Dynamic(DynamicResponses),
    Mask { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseOption {
    pub value: String,
    pub label: String,
}

impl ResponseOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DynamicSource {
    Csv { file: String },
    Database { table: String },
}

impl DynamicSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Csv { .. } => "csv",
            Self::Database { .. } => "database",
        }
    }

    /// Attribute name and value that locate the source (`file` or `table`).
    pub fn locator(&self) -> (&'static str, &str) {
        match self {
            Self::Csv { file } => ("file", file),
            Self::Database { table } => ("table", table),
        }
    }
}

/// Responses resolved at runtime by the survey application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicResponses {
    pub source: DynamicSource,
    pub filters: Vec<ResponseFilter>,
    pub display: String,
    pub value: String,
    pub distinct: Option<bool>,
    pub empty_message: Option<String>,
    pub dont_know: Option<SpecialResponse>,
    pub not_in_list: Option<SpecialResponse>,
}

/// `dont_know:` / `not_in_list:` extra entry, written as `value[, label]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialResponse {
    pub value: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Eq,
    NotEq,
    LtGt,
    Gt,
    Lt,
    Ge,
    Le,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 7] = [
        Self::Eq,
        Self::NotEq,
        Self::LtGt,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::LtGt => "<>",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a filter. References stay unresolved until runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValue {
    Literal(String),
    /// `[[fieldname]]`, kept verbatim.
    Reference(String),
}

impl FilterValue {
    /// Cell text as written, including the `[[ ]]` brackets for references.
    pub fn as_written(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Reference(field) => format!("[[{field}]]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_operator_tokens() {
        for op in FilterOperator::ALL {
            assert_eq!(FilterOperator::parse(op.as_str()), Some(op));
        }
        assert_eq!(FilterOperator::parse("=="), None);
    }

    #[test]
    fn reference_is_written_back_with_brackets() {
        let value = FilterValue::Reference("district".to_string());
        assert_eq!(value.as_written(), "[[district]]");
    }

    #[test]
    fn locator_names_the_source_attribute() {
        let csv = DynamicSource::Csv {
            file: "villages".into(),
        };
        assert_eq!(csv.kind(), "csv");
        assert_eq!(csv.locator(), ("file", "villages"));
    }
}
