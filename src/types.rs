//! Small value types shared across the crate.
//!
//! This module provides newtype wrappers for printer binding levels, the
//! sort of an operand (boolean-valued or not), and the three-valued outcome
//! of testing a predicate under an assumption.
use std::fmt;

use crate::reference::ExprRef;

/// Binding strength used by [`tostr`][crate::context::Context::tostr].
///
/// A node is parenthesized iff its own precedence is at or below the level
/// requested by the caller.
///
/// # Invariants
///
/// - The ladder is fixed: atom > item-access > apply > power > multiplication > addition > lambda
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Precedence(u16);

impl Precedence {
    /// Binds loosest; the top-level printing level is below even this.
    pub const TOP: Precedence = Precedence(0);
    pub const LAMBDA: Precedence = Precedence(1);
    pub const ADD: Precedence = Precedence(40);
    pub const MUL: Precedence = Precedence(50);
    pub const POW: Precedence = Precedence(60);
    pub const APPLY: Precedence = Precedence(70);
    pub const ITEM: Precedence = Precedence(75);
    pub const ATOM: Precedence = Precedence(1000);

    /// Returns the raw level.
    pub fn level(self) -> u16 {
        self.0
    }

    /// Whether a node of this precedence needs parentheses at `level`.
    pub fn needs_parens(self, level: Precedence) -> bool {
        self <= level
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Sort of an operand in a function signature.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sort {
    /// Predicates, boolean literals and symbols.
    Boolean,
    /// Anything that is not a predicate or a boolean literal (symbols included).
    Value,
    /// No restriction.
    Any,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Boolean => write!(f, "boolean"),
            Sort::Value => write!(f, "value"),
            Sort::Any => write!(f, "any"),
        }
    }
}

/// Outcome of testing a predicate under an assumption.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Truth {
    True,
    False,
    /// The truth depends on something the assumption does not decide.
    Unknown(ExprRef),
}

impl Truth {
    pub fn is_true(self) -> bool {
        matches!(self, Truth::True)
    }

    pub fn is_false(self) -> bool {
        matches!(self, Truth::False)
    }

    /// Returns the decided value, if any.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Unknown(_) => None,
        }
    }
}
