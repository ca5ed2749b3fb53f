//! Numeric and date range bounds.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl DateUnit {
    pub fn as_char(self) -> char {
        match self {
            Self::Days => 'd',
            Self::Weeks => 'w',
            Self::Months => 'm',
            Self::Years => 'y',
        }
    }
}

impl FromStr for DateUnit {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "d" => Ok(Self::Days),
            "w" => Ok(Self::Weeks),
            "m" => Ok(Self::Months),
            "y" => Ok(Self::Years),
            _ => Err(ModelError::UnknownDateUnit(s.to_string())),
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Signed relative offset such as `+28d` or `-1y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateOffset {
    pub amount: i64,
    pub unit: DateUnit,
}

impl FromStr for DateOffset {
    type Err = ModelError;

    /// Accepts `[+-]\d+[dwmy]`; the sign is mandatory.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidDateOffset(s.to_string());
        if s.len() < 3 || !(s.starts_with('+') || s.starts_with('-')) {
            return Err(invalid());
        }
        let sign = if s.starts_with('-') { '-' } else { '+' };
        let unit_char = s.chars().last().ok_or_else(invalid)?;
        let digits = &s[1..s.len() - unit_char.len_utf8()];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let unit = match unit_char {
            'd' => DateUnit::Days,
            'w' => DateUnit::Weeks,
            'm' => DateUnit::Months,
            'y' => DateUnit::Years,
            _ => return Err(invalid()),
        };
        let magnitude: i64 = digits.parse().map_err(|_| invalid())?;
        let amount = if sign == '-' { -magnitude } else { magnitude };
        Ok(Self { amount, unit })
    }
}

impl fmt::Display for DateOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { '-' } else { '+' };
        write!(f, "{sign}{}{}", self.amount.unsigned_abs(), self.unit)
    }
}

/// One side of a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateBound {
    /// Literal `0`: the current date.
    Zero,
    Relative(DateOffset),
    Absolute(NaiveDate),
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("0"),
            Self::Relative(offset) => write!(f, "{offset}"),
            Self::Absolute(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeSpec {
    /// Bounds are kept as written so `10` and `10.0` serialize unchanged.
    Numeric {
        lower: Option<String>,
        upper: Option<String>,
    },
    Date {
        lower: DateBound,
        upper: DateBound,
    },
}
