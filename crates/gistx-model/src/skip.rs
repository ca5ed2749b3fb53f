//! Pre/post skip rules.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipPhase {
    Pre,
    Post,
}

impl SkipPhase {
    /// Line prefix, including the colon.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Pre => "preskip:",
            Self::Post => "postskip:",
        }
    }

    /// XML element wrapping rules of this phase.
    pub fn element(self) -> &'static str {
        match self {
            Self::Pre => "preskip",
            Self::Post => "postskip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipCondition {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    NotEq,
    Contains,
    DoesNotContain,
}

impl SkipCondition {
    /// Parses a single comparison token; `'contains'` must keep its quotes.
    pub fn parse_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            "<>" => Some(Self::NotEq),
            "'contains'" => Some(Self::Contains),
            _ => None,
        }
    }

    /// Value of the `condition` attribute in the XML output.
    pub fn as_xml(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::NotEq => "<>",
            Self::Contains => "contains",
            Self::DoesNotContain => "does not contain",
        }
    }

    /// Conditions that only make sense against a checkbox answer.
    pub fn is_membership(self) -> bool {
        matches!(self, Self::Contains | Self::DoesNotContain)
    }
}

impl fmt::Display for SkipCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_xml())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRule {
    pub phase: SkipPhase,
    pub check_field: String,
    pub condition: SkipCondition,
    pub value: String,
    pub target_field: String,
}
