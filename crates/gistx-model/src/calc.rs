//! Calculation specs for `automatic` questions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::range::{DateOffset, DateUnit};
use crate::response::FilterOperator;

/// The ten calculation kinds, one per `calc:<kind>` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcKind {
    Constant,
    Lookup,
    Query,
    Math,
    Concat,
    Case,
    AgeFromDate,
    AgeAtDate,
    DateOffset,
    DateDiff,
}

impl CalcKind {
    pub const ALL: [CalcKind; 10] = [
        Self::Constant,
        Self::Lookup,
        Self::Query,
        Self::Math,
        Self::Concat,
        Self::Case,
        Self::AgeFromDate,
        Self::AgeAtDate,
        Self::DateOffset,
        Self::DateDiff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Lookup => "lookup",
            Self::Query => "query",
            Self::Math => "math",
            Self::Concat => "concat",
            Self::Case => "case",
            Self::AgeFromDate => "age_from_date",
            Self::AgeAtDate => "age_at_date",
            Self::DateOffset => "date_offset",
            Self::DateDiff => "date_diff",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        let lower = token.to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == lower)
    }

    /// Keys this kind reads, other than the `calc` discriminant itself.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Constant => &["value"],
            Self::Lookup => &["field"],
            Self::Query => &["sql", "param"],
            Self::Math => &["operator", "part"],
            Self::Concat => &["separator", "part"],
            Self::Case => &["when", "else"],
            Self::AgeFromDate | Self::DateOffset => &["field", "value"],
            Self::AgeAtDate => &["field", "value", "separator"],
            Self::DateDiff => &["field", "value", "unit"],
        }
    }
}

impl fmt::Display for CalcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl MathOperator {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// `@name = fieldName` binding for a query calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Always carries the leading `@`.
    pub name: String,
    pub field: String,
}

/// Operand of a math or concat calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcPart {
    Constant(String),
    Lookup(String),
    Query(String),
}

impl CalcPart {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Lookup(_) => "lookup",
            Self::Query(_) => "query",
        }
    }
}

/// `when <field> <op> <value> => <result>` branch of a case calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
    pub result: String,
}

/// Reference date for `age_from_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeReference {
    Today,
    Field(String),
}

impl AgeReference {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Today => "today",
            Self::Field(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalcSpec {
    Constant {
        value: String,
    },
    Lookup {
        field: String,
    },
    Query {
        sql: String,
        params: Vec<QueryParam>,
    },
    Math {
        operator: MathOperator,
        parts: Vec<CalcPart>,
    },
    Concat {
        separator: Option<String>,
        parts: Vec<CalcPart>,
    },
    Case {
        whens: Vec<CaseWhen>,
        otherwise: Option<String>,
    },
    AgeFromDate {
        field: String,
        reference: AgeReference,
    },
    AgeAtDate {
        field: String,
        value: String,
        separator: Option<String>,
    },
    DateOffset {
        field: String,
        offset: DateOffset,
    },
    DateDiff {
        field: String,
        value: String,
        unit: DateUnit,
    },
}

impl CalcSpec {
    pub fn kind(&self) -> CalcKind {
        match self {
            Self::Constant { .. } => CalcKind::Constant,
            Self::Lookup { .. } => CalcKind::Lookup,
            Self::Query { .. } => CalcKind::Query,
            Self::Math { .. } => CalcKind::Math,
            Self::Concat { .. } => CalcKind::Concat,
            Self::Case { .. } => CalcKind::Case,
            Self::AgeFromDate { .. } => CalcKind::AgeFromDate,
            Self::AgeAtDate { .. } => CalcKind::AgeAtDate,
            Self::DateOffset { .. } => CalcKind::DateOffset,
            Self::DateDiff { .. } => CalcKind::DateDiff,
        }
    }
}
