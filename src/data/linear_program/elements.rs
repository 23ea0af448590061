//! # Building blocks to describe linear programs.
use std::fmt;

/// A `Constraint` is a type of (in)equality.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConstraintType {
    Equal,
    Greater,
    Less,
}

impl ConstraintType {
    /// The relation after multiplying both sides with a negative factor.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::Greater => Self::Less,
            Self::Less => Self::Greater,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::Greater => write!(f, ">="),
            Self::Less => write!(f, "<="),
        }
    }
}

/// Direction of optimization.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    Maximize,
    Minimize,
}

impl Default for Objective {
    fn default() -> Self {
        Objective::Maximize
    }
}

/// A property of a decision variable.
///
/// Variables carry a set of these tags rather than a single type: every variable is non-negative,
/// and may additionally be restricted to integer values or explicitly marked real.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum VariableTag {
    NonNegative,
    Integer,
    Real,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flipped() {
        assert_eq!(ConstraintType::Less.flipped(), ConstraintType::Greater);
        assert_eq!(ConstraintType::Greater.flipped(), ConstraintType::Less);
        assert_eq!(ConstraintType::Equal.flipped(), ConstraintType::Equal);
    }
}
