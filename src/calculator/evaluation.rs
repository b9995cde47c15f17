//! Postfix evaluation and the top-level `evaluate` entry point.

use tracing::debug;

use super::error::EvalError;
use super::postfix::to_postfix;
use super::tables::{Function, Operator};
use super::tokenizer::{Token, format_tokens, tokenize};

/// Scale used to strip binary floating-point noise from results.
const ROUNDING_SCALE: f64 = 1e12;

/// Evaluate a mathematical expression.
///
/// Runs the tokenizer, the postfix converter and the postfix evaluator in
/// turn; the first failure is returned unchanged. The result is rounded to
/// 12 fractional digits, so `0.1+0.2` yields `0.3`.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    if expression.trim().is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    let tokens = tokenize(expression)?;
    let postfix = to_postfix(&tokens)?;
    debug!(expression, postfix = %format_tokens(&postfix), "converted to postfix");

    let value = evaluate_postfix(&postfix)?;
    Ok(round_result(value))
}

/// Execute a postfix sequence on a value stack.
pub fn evaluate_postfix(postfix: &[Token]) -> Result<f64, EvalError> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match *token {
            Token::Number(n) => stack.push(n),
            Token::Constant(c) => stack.push(c.value()),
            Token::Operator(op) => {
                let b = stack.pop().ok_or(EvalError::InvalidExpression)?;
                let a = stack.pop().ok_or(EvalError::InvalidExpression)?;
                stack.push(apply_operator(op, a, b)?);
            }
            Token::Function(func) => {
                let arg = stack.pop().ok_or(EvalError::InvalidExpression)?;
                stack.push(apply_function(func, arg)?);
            }
            Token::LParen | Token::RParen => return Err(EvalError::InvalidExpression),
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(EvalError::InvalidExpression),
    }
}

fn apply_operator(op: Operator, a: f64, b: f64) -> Result<f64, EvalError> {
    let value = match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        // Truncated remainder: the sign follows the dividend.
        Operator::Rem => a % b,
        Operator::Pow => a.powf(b),
    };
    Ok(value)
}

fn apply_function(function: Function, arg: f64) -> Result<f64, EvalError> {
    if !function.accepts(arg) {
        return Err(EvalError::DomainError { function });
    }
    Ok((function.spec().apply)(arg))
}

/// Round to 12 fractional digits. Values too large to scale are returned
/// as they are.
fn round_result(value: f64) -> f64 {
    let scaled = value * ROUNDING_SCALE;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / ROUNDING_SCALE
}
