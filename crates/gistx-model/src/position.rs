//! Row positions and the ordering rules that relate them.
//!
//! Every question carries the 1-based worksheet row it was read from. All
//! "defined before" / "defined after" rules are expressed as an [`OrderRule`]
//! evaluated over two positions, so logic-check and skip references share one
//! predicate instead of scattered index comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 1-based row position within a worksheet (row 1 is the header).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(usize);

impl Position {
    pub const HEADER: Position = Position(1);

    pub fn new(row: usize) -> Self {
        Self(row)
    }

    pub fn row(self) -> usize {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a referenced row must sit relative to the row that owns the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRule {
    /// Referenced row is strictly before the owner.
    StrictlyBefore,
    /// Referenced row is the owner itself or any earlier row.
    AtOrBefore,
    /// Referenced row is strictly after the owner.
    StrictlyAfter,
}

impl OrderRule {
    /// Returns true when `referenced` satisfies this rule relative to `owner`.
    pub fn holds(self, owner: Position, referenced: Position) -> bool {
        match self {
            Self::StrictlyBefore => referenced < owner,
            Self::AtOrBefore => referenced <= owner,
            Self::StrictlyAfter => referenced > owner,
        }
    }

    /// Short phrase used in issue messages ("must appear before current row").
    pub fn describe(self) -> &'static str {
        match self {
            Self::StrictlyBefore => "must appear before current row",
            Self::AtOrBefore => "must not appear after current row",
            Self::StrictlyAfter => "must appear after current row",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_before_rejects_same_row() {
        let owner = Position::new(5);
        assert!(OrderRule::StrictlyBefore.holds(owner, Position::new(4)));
        assert!(!OrderRule::StrictlyBefore.holds(owner, Position::new(5)));
        assert!(!OrderRule::StrictlyBefore.holds(owner, Position::new(6)));
    }

    #[test]
    fn at_or_before_accepts_same_row() {
        let owner = Position::new(5);
        assert!(OrderRule::AtOrBefore.holds(owner, Position::new(5)));
        assert!(!OrderRule::AtOrBefore.holds(owner, Position::new(6)));
    }

    #[test]
    fn strictly_after() {
        let owner = Position::new(5);
        assert!(OrderRule::StrictlyAfter.holds(owner, Position::new(9)));
        assert!(!OrderRule::StrictlyAfter.holds(owner, Position::new(5)));
        assert!(!OrderRule::StrictlyAfter.holds(owner, Position::new(2)));
    }
}
