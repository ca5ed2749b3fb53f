//! Parsers for the languages embedded in data dictionary cells.
//!
//! Each parser takes the raw cell text, records problems in an
//! [`IssueSink`](crate::IssueSink), and returns the typed value only when it
//! added no errors.

pub mod calc;
pub mod logic;
pub mod range;
pub mod response;
pub mod skip;

pub use calc::parse_calc;
pub use logic::{parse_logic_checks, referenced_fields};
pub use range::{parse_date_range, parse_numeric_range};
pub use response::{ResponsesMode, parse_dynamic, parse_mask, parse_static, responses_mode};
pub use skip::parse_skip_rules;
