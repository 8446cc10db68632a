//! Formula error types
//!
//! The `Display` text of each variant is the message stored on a cell and
//! matched on by callers, so it must not change.

use thiserror::Error;

/// Errors recorded while evaluating a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// The token sequence is empty
    #[error("empty formula")]
    EmptyFormula,

    /// An open parenthesis ends a group, or the group ends in an operator
    #[error("invalid formula")]
    InvalidFormula,

    /// An open parenthesis is immediately followed by a close parenthesis
    #[error("missing parentheses")]
    MissingParentheses,

    /// A divisor evaluated to exactly zero
    #[error("divide by zero")]
    DivideByZero,

    /// A referenced cell has no formula
    #[error("invalid cell")]
    InvalidCell,

    /// Any other error carried by a referenced cell, passed on verbatim
    #[error("{0}")]
    Inherited(String),
}

impl FormulaError {
    /// Map a stored error message back to its kind.
    ///
    /// Returns `None` for the empty message. Messages outside the fixed set
    /// become [`FormulaError::Inherited`].
    pub fn from_message(message: &str) -> Option<Self> {
        let err = match message {
            "" => return None,
            "empty formula" => FormulaError::EmptyFormula,
            "invalid formula" => FormulaError::InvalidFormula,
            "missing parentheses" => FormulaError::MissingParentheses,
            "divide by zero" => FormulaError::DivideByZero,
            "invalid cell" => FormulaError::InvalidCell,
            other => FormulaError::Inherited(other.to_string()),
        };
        Some(err)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FormulaError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(FormulaError::EmptyFormula.to_string(), "empty formula");
        assert_eq!(FormulaError::InvalidFormula.to_string(), "invalid formula");
        assert_eq!(
            FormulaError::MissingParentheses.to_string(),
            "missing parentheses"
        );
        assert_eq!(FormulaError::DivideByZero.to_string(), "divide by zero");
        assert_eq!(FormulaError::InvalidCell.to_string(), "invalid cell");
        assert_eq!(FormulaError::Inherited("#REF!".into()).to_string(), "#REF!");
    }

    #[test]
    fn test_from_message() {
        assert_eq!(FormulaError::from_message(""), None);
        assert_eq!(
            FormulaError::from_message("divide by zero"),
            Some(FormulaError::DivideByZero)
        );
        assert_eq!(
            FormulaError::from_message("circular reference"),
            Some(FormulaError::Inherited("circular reference".into()))
        );
    }
}
