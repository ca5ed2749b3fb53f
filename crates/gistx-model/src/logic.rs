use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Reserved expression that asks for a database-level uniqueness check.
pub const UNIQUE_EXPRESSION: &str = "unique";

/// One `expression; 'message'` line of the LogicCheck column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicCheck {
    pub expression: String,
    /// Message with the surrounding single quotes removed.
    pub message: String,
    pub is_unique_check: bool,
    /// Field names mentioned in the expression, sorted for stable reporting.
    pub referenced_fields: BTreeSet<String>,
}

impl LogicCheck {
    pub fn unique(message: impl Into<String>) -> Self {
        Self {
            expression: UNIQUE_EXPRESSION.to_string(),
            message: message.into(),
            is_unique_check: true,
            referenced_fields: BTreeSet::new(),
        }
    }
}
