use thiserror::Error;

/// Errors raised when a vocabulary token does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown QuestionType '{0}'")]
    UnknownQuestionType(String),
    #[error("unknown FieldType '{0}'")]
    UnknownFieldType(String),
    #[error("unknown date unit '{0}' (expected d, w, m or y)")]
    UnknownDateUnit(String),
    #[error("invalid date offset '{0}' (expected e.g. +28d or -1y)")]
    InvalidDateOffset(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
