//! Error types for expression evaluation.

use thiserror::Error;

use super::tables::Function;

/// Discriminant of an [`EvalError`], for callers that branch on the
/// failure without inspecting its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyExpression,
    UnknownCharacter,
    InvalidNumber,
    MismatchedParentheses,
    InvalidExpression,
    DivisionByZero,
    DomainError,
}

/// Errors that can occur while tokenizing, converting or evaluating an
/// expression.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("Empty expression")]
    EmptyExpression,

    /// `pos` is the character index after whitespace has been stripped.
    #[error("Unknown character: {ch}")]
    UnknownCharacter { ch: char, pos: usize },

    #[error("Invalid number: {literal}")]
    InvalidNumber { literal: String, pos: usize },

    #[error("Mismatched parentheses")]
    MismatchedParentheses,

    #[error("Invalid expression")]
    InvalidExpression,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("{function} domain error")]
    DomainError { function: Function },
}

impl EvalError {
    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyExpression => ErrorKind::EmptyExpression,
            Self::UnknownCharacter { .. } => ErrorKind::UnknownCharacter,
            Self::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            Self::MismatchedParentheses => ErrorKind::MismatchedParentheses,
            Self::InvalidExpression => ErrorKind::InvalidExpression,
            Self::DivisionByZero => ErrorKind::DivisionByZero,
            Self::DomainError { .. } => ErrorKind::DomainError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(EvalError::EmptyExpression.to_string(), "Empty expression");
        assert_eq!(
            EvalError::UnknownCharacter { ch: '@', pos: 1 }.to_string(),
            "Unknown character: @"
        );
        assert_eq!(
            EvalError::DomainError {
                function: Function::Sqrt
            }
            .to_string(),
            "sqrt domain error"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(
            EvalError::InvalidNumber {
                literal: "1.2.3".to_string(),
                pos: 0
            }
            .kind(),
            ErrorKind::InvalidNumber
        );
        assert_eq!(EvalError::DivisionByZero.kind(), ErrorKind::DivisionByZero);
    }
}
