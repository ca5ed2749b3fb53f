//! The fourteen data dictionary columns, in worksheet order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A data dictionary column. Declaration order is worksheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    FieldName,
    QuestionType,
    FieldType,
    QuestionText,
    MaxCharacters,
    Responses,
    LowerRange,
    UpperRange,
    LogicCheck,
    DontKnow,
    Refuse,
    Na,
    Skip,
    Comments,
}

/// How the text of a column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLanguage {
    /// Identifier matching `^[a-z][a-z0-9_]*$`.
    Identifier,
    /// One token from a closed vocabulary.
    Vocabulary,
    /// Free text, required unless the question is automatic.
    Text,
    /// Integer in `[1, 2000]`, optionally `=`-prefixed.
    BoundedInteger,
    /// Static/dynamic response list, input mask, or calculation.
    Responses,
    /// Numeric bound or date bound depending on the field type.
    RangeBound,
    /// `expression; 'message'` lines.
    LogicChecks,
    /// `True` / `False`.
    Flag,
    /// `preskip:` / `postskip:` lines.
    SkipRules,
    /// Not interpreted.
    Ignored,
}

impl CellLanguage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Vocabulary => "vocabulary",
            Self::Text => "text",
            Self::BoundedInteger => "integer 1-2000",
            Self::Responses => "responses / mask / calc",
            Self::RangeBound => "numeric or date bound",
            Self::LogicChecks => "logic checks",
            Self::Flag => "True/False",
            Self::SkipRules => "skip rules",
            Self::Ignored => "ignored",
        }
    }
}

impl Column {
    /// All columns in worksheet order.
    pub const ALL: [Column; 14] = [
        Column::FieldName,
        Column::QuestionType,
        Column::FieldType,
        Column::QuestionText,
        Column::MaxCharacters,
        Column::Responses,
        Column::LowerRange,
        Column::UpperRange,
        Column::LogicCheck,
        Column::DontKnow,
        Column::Refuse,
        Column::Na,
        Column::Skip,
        Column::Comments,
    ];

    /// Header text expected in row 1.
    pub fn name(self) -> &'static str {
        match self {
            Self::FieldName => "FieldName",
            Self::QuestionType => "QuestionType",
            Self::FieldType => "FieldType",
            Self::QuestionText => "QuestionText",
            Self::MaxCharacters => "MaxCharacters",
            Self::Responses => "Responses",
            Self::LowerRange => "LowerRange",
            Self::UpperRange => "UpperRange",
            Self::LogicCheck => "LogicCheck",
            Self::DontKnow => "DontKnow",
            Self::Refuse => "Refuse",
            Self::Na => "NA",
            Self::Skip => "Skip",
            Self::Comments => "Comments",
        }
    }

    /// Zero-based cell index within a row.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn language(self) -> CellLanguage {
        match self {
            Self::FieldName => CellLanguage::Identifier,
            Self::QuestionType | Self::FieldType => CellLanguage::Vocabulary,
            Self::QuestionText => CellLanguage::Text,
            Self::MaxCharacters => CellLanguage::BoundedInteger,
            Self::Responses => CellLanguage::Responses,
            Self::LowerRange | Self::UpperRange => CellLanguage::RangeBound,
            Self::LogicCheck => CellLanguage::LogicChecks,
            Self::DontKnow | Self::Refuse | Self::Na => CellLanguage::Flag,
            Self::Skip => CellLanguage::SkipRules,
            Self::Comments => CellLanguage::Ignored,
        }
    }

    /// Comma-separated header list used in schema error messages.
    pub fn expected_header_line() -> String {
        Self::ALL
            .iter()
            .map(|column| column.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_follow_declaration_order() {
        for (idx, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), idx);
        }
        assert_eq!(Column::Comments.index(), 13);
    }

    #[test]
    fn header_line_lists_all_columns() {
        let line = Column::expected_header_line();
        assert!(line.starts_with("FieldName, QuestionType, FieldType"));
        assert!(line.ends_with("NA, Skip, Comments"));
    }
}
