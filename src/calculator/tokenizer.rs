//! Tokenizer for calculator expressions.

use std::fmt;

use super::error::EvalError;
use super::tables::{Constant, FUNCTIONS, Function, Operator};

/// A lexical token of an infix expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    Function(Function),
    Constant(Constant),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Operator(op) => write!(f, "{}", op),
            Self::Function(func) => write!(f, "{}", func),
            Self::Constant(c) => write!(f, "{}", c),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

/// Join tokens with single spaces, e.g. `2 3 4 * +` for a postfix sequence.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split an expression into tokens.
///
/// Whitespace is removed before scanning. A `-` at the start of the input,
/// after `(` or after another operator is rewritten as `0 -`, so unary
/// minus goes through the ordinary subtraction rules (`-2^2` is `0 - 2^2`).
pub fn tokenize(expression: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = expression.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if is_number_char(c) {
            let start = i;
            while i < chars.len() && is_number_char(chars[i]) {
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            let value = literal
                .parse::<f64>()
                .map_err(|_| EvalError::InvalidNumber {
                    literal: literal.clone(),
                    pos: start,
                })?;
            tokens.push(Token::Number(value));
            continue;
        }

        // `exp` wins over the constant `e`.
        if c == 'e' {
            if matches_at(&chars, i, Function::Exp.name()) {
                tokens.push(Token::Function(Function::Exp));
                i += Function::Exp.name().len();
            } else {
                tokens.push(Token::Constant(Constant::E));
                i += 1;
            }
            continue;
        }

        if c == 'π' {
            tokens.push(Token::Constant(Constant::Pi));
            i += 1;
            continue;
        }

        if let Some(spec) = FUNCTIONS.iter().find(|spec| matches_at(&chars, i, spec.name)) {
            tokens.push(Token::Function(spec.function));
            i += spec.name.len();
            continue;
        }

        if matches_at(&chars, i, "pi") {
            tokens.push(Token::Constant(Constant::Pi));
            i += 2;
            continue;
        }

        if let Some(op) = Operator::from_symbol(c) {
            if op == Operator::Sub
                && matches!(
                    tokens.last(),
                    None | Some(Token::LParen) | Some(Token::Operator(_))
                )
            {
                tokens.push(Token::Number(0.0));
            }
            tokens.push(Token::Operator(op));
            i += 1;
            continue;
        }

        match c {
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            _ => return Err(EvalError::UnknownCharacter { ch: c, pos: i }),
        }
        i += 1;
    }

    Ok(tokens)
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Check whether `word` occurs in `chars` starting at `pos`.
/// Names in the tables are ASCII, so their byte length is their char count.
fn matches_at(chars: &[char], pos: usize, word: &str) -> bool {
    let mut rest = chars[pos..].iter();
    word.chars().all(|w| rest.next() == Some(&w))
}
