pub mod calc;
pub mod crfs;
pub mod error;
pub mod issue;
pub mod logic;
pub mod manifest;
pub mod position;
pub mod question;
pub mod range;
pub mod response;
pub mod schema;
pub mod skip;

pub use calc::{AgeReference, CalcKind, CalcPart, CalcSpec, CaseWhen, MathOperator, QueryParam};
pub use crfs::{CRFS_WORKSHEET, CrfsColumn, CrfsEntry, IdConfig, IdConfigField};
pub use error::{ModelError, Result};
pub use issue::{Issue, IssueKind, Severity, count_by_severity};
pub use logic::{LogicCheck, UNIQUE_EXPRESSION};
pub use manifest::{MANIFEST_FILE_NAME, SurveyManifest};
pub use position::{OrderRule, Position};
pub use question::{
    BUILT_IN_AUTOMATIC_FIELDS, END_OF_QUESTIONS, FieldType, Question, QuestionType,
    is_built_in_automatic, requires_max_characters,
};
pub use range::{DateBound, DateOffset, DateUnit, RangeSpec};
pub use response::{
    DynamicResponses, DynamicSource, FilterOperator, FilterValue, ResponseFilter, ResponseOption,
    ResponseSpec, SpecialResponse,
};
pub use schema::{CellLanguage, Column};
pub use skip::{SkipCondition, SkipPhase, SkipRule};
