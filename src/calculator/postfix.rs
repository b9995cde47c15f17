//! Infix to postfix conversion (shunting yard).

use super::error::EvalError;
use super::tokenizer::Token;

/// Reorder infix tokens into postfix (RPN) order.
///
/// Functions sit on the operator stack until the `)` that closes their
/// argument, or until a following operator flushes them. They are never
/// compared by precedence.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, EvalError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Number(_) | Token::Constant(_) => output.push(token),

            Token::Function(_) | Token::LParen => stack.push(token),

            Token::Operator(current) => {
                while let Some(&top) = stack.last() {
                    let pop = match top {
                        Token::Function(_) => true,
                        Token::Operator(top_op) => current.yields_to(top_op),
                        _ => false,
                    };
                    if !pop {
                        break;
                    }
                    output.push(top);
                    stack.pop();
                }
                stack.push(token);
            }

            Token::RParen => {
                loop {
                    match stack.pop() {
                        Some(Token::LParen) => break,
                        Some(top) => output.push(top),
                        None => return Err(EvalError::MismatchedParentheses),
                    }
                }
                if let Some(Token::Function(_)) = stack.last() {
                    output.extend(stack.pop());
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Token::LParen {
            return Err(EvalError::MismatchedParentheses);
        }
        output.push(top);
    }

    Ok(output)
}
