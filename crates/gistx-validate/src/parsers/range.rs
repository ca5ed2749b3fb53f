//! LowerRange / UpperRange cells.

use std::sync::LazyLock;

use chrono::NaiveDate;
use gistx_model::{Column, DateBound, DateOffset, IssueKind, RangeSpec};
use regex::Regex;

use crate::collector::{Checkpoint, IssueSink};

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("Invalid number regex"));

static ISO_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid ISO date regex"));

/// Numeric bounds. Each present bound is checked on its own; a range may be
/// open on either side.
pub fn parse_numeric_range(
    lower: &str,
    upper: &str,
    sink: &mut IssueSink<'_>,
) -> Option<RangeSpec> {
    if lower.is_empty() && upper.is_empty() {
        return None;
    }
    let mark = Checkpoint::new(sink);
    for (text, column) in [(lower, Column::LowerRange), (upper, Column::UpperRange)] {
        if !text.is_empty() && !NUMBER_REGEX.is_match(text) {
            sink.error(
                IssueKind::FieldFormat,
                column,
                format!("{column} must be an integer or decimal, found '{text}'"),
            );
        }
    }
    if !mark.clean(sink) {
        return None;
    }
    if let (Ok(low), Ok(high)) = (lower.parse::<f64>(), upper.parse::<f64>())
        && low > high
    {
        sink.warning(
            IssueKind::FieldFormat,
            Column::UpperRange,
            format!("UpperRange {upper} is below LowerRange {lower}"),
        );
    }
    let bound = |text: &str| (!text.is_empty()).then(|| text.to_string());
    Some(RangeSpec::Numeric {
        lower: bound(lower),
        upper: bound(upper),
    })
}

/// Date bounds: `0`, a signed offset such as `-1y`, or `yyyy-mm-dd`.
///
/// With `required` both bounds must be present; otherwise an empty pair means
/// no range.
pub fn parse_date_range(
    lower: &str,
    upper: &str,
    required: bool,
    sink: &mut IssueSink<'_>,
) -> Option<RangeSpec> {
    if !required && lower.is_empty() && upper.is_empty() {
        return None;
    }
    let lower = parse_date_bound(lower, Column::LowerRange, sink);
    let upper = parse_date_bound(upper, Column::UpperRange, sink);
    Some(RangeSpec::Date {
        lower: lower?,
        upper: upper?,
    })
}

fn parse_date_bound(text: &str, column: Column, sink: &mut IssueSink<'_>) -> Option<DateBound> {
    if text.is_empty() {
        sink.error(
            IssueKind::FieldFormat,
            column,
            format!("{column} is required for date fields"),
        );
        return None;
    }
    if text == "0" {
        return Some(DateBound::Zero);
    }
    if text.starts_with(['+', '-']) {
        return match text.parse::<DateOffset>() {
            Ok(offset) => Some(DateBound::Relative(offset)),
            Err(_) => {
                sink.error(
                    IssueKind::FieldFormat,
                    column,
                    format!("{column} offset '{text}' must look like +28d or -1y"),
                );
                None
            }
        };
    }
    if ISO_DATE_REGEX.is_match(text) {
        return match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => Some(DateBound::Absolute(date)),
            Err(_) => {
                sink.error(
                    IssueKind::FieldFormat,
                    column,
                    format!("{column} '{text}' is not a valid calendar date"),
                );
                None
            }
        };
    }
    sink.error(
        IssueKind::FieldFormat,
        column,
        format!("{column} '{text}' must be 0, a relative offset like +28d, or yyyy-mm-dd"),
    );
    None
}
