//! Expression detection.
//!
//! Decides whether a line of text is a calculator expression worth
//! evaluating. Prose must come back `false` so callers can pass it through
//! untouched.

use lazy_static::lazy_static;
use regex::Regex;

use super::tokenizer::{Token, tokenize};

lazy_static! {
    /// Cheap pre-filter: only characters some token can start with.
    static ref CALC_CHARS: Regex = Regex::new(
        r"^[\d\s\.\+\-\*/%\^()πa-z]+$"
    ).unwrap();
}

/// Check if input looks like a calculator expression.
///
/// The input must tokenize cleanly, so every letter run has to spell a
/// known function or constant (`state-of-the-art` is rejected at the `s`).
/// A bare number, signed or not, is not an expression; anything with an
/// operator, a function or a constant is.
pub fn looks_like_expression(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() || !CALC_CHARS.is_match(trimmed) {
        return false;
    }

    let Ok(tokens) = tokenize(trimmed) else {
        return false;
    };

    !is_signed_number(trimmed)
        && tokens
            .iter()
            .any(|t| matches!(t, Token::Operator(_) | Token::Function(_) | Token::Constant(_)))
}

/// `-5` tokenizes as `0 - 5`, which cannot be told apart from a typed
/// `0-5`, so the sign is stripped from the text instead.
fn is_signed_number(input: &str) -> bool {
    let unsigned = input.strip_prefix('-').unwrap_or(input);
    matches!(tokenize(unsigned).as_deref(), Ok([Token::Number(_)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers_rejected() {
        assert!(!looks_like_expression("123"));
        assert!(!looks_like_expression("42.5"));
        assert!(!looks_like_expression("-123"));
        assert!(!looks_like_expression("  42  "));
    }

    #[test]
    fn test_expressions_accepted() {
        assert!(looks_like_expression("2+2"));
        assert!(looks_like_expression("2 + 2"));
        assert!(looks_like_expression("10 * 5"));
        assert!(looks_like_expression("100 / 4"));
        assert!(looks_like_expression("2^8"));
        assert!(looks_like_expression("10 % 3"));
        assert!(looks_like_expression("(2 + 3) * 4"));
        assert!(looks_like_expression("10 - 5"));
        assert!(looks_like_expression("0-5"));
    }

    #[test]
    fn test_functions_and_constants_accepted() {
        assert!(looks_like_expression("sin(0)"));
        assert!(looks_like_expression("sqrt (9)"));
        assert!(looks_like_expression("abs(-5)"));
        assert!(looks_like_expression("π"));
        assert!(looks_like_expression("pi"));
        assert!(looks_like_expression("e"));
        assert!(looks_like_expression("2*pi"));
    }

    #[test]
    fn test_prose_rejected() {
        assert!(!looks_like_expression(""));
        assert!(!looks_like_expression("a"));
        assert!(!looks_like_expression("hello world"));
        assert!(!looks_like_expression("pipe"));
        assert!(!looks_like_expression("2 apples, 3 pears"));
        assert!(!looks_like_expression("price: $5"));
        assert!(!looks_like_expression("see e below"));
        assert!(!looks_like_expression("Sin(0)"));
    }

    #[test]
    fn test_hyphenated_words_rejected() {
        assert!(!looks_like_expression("state-of-the-art"));
        assert!(!looks_like_expression("well-known fact"));
        assert!(!looks_like_expression("e-mail"));
        assert!(!looks_like_expression("pi-hole"));
    }
}
