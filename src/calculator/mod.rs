//! Calculator module for evaluating mathematical expressions.
//!
//! This module provides functionality to:
//! - Tokenize infix expressions and convert them to postfix (shunting yard)
//! - Evaluate postfix sequences to a number
//! - Format results for display and detect expression-like input
//! - Copy results to the clipboard

mod clipboard;
mod detection;
mod display;
mod error;
mod evaluation;
mod postfix;
pub mod tables;
mod tokenizer;

pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use detection::looks_like_expression;
pub use display::{
    CalcResult, DisplayOptions, auto_close_parentheses, evaluate_expression, format_clipboard,
    format_display,
};
pub use error::{ErrorKind, EvalError};
pub use evaluation::{evaluate, evaluate_postfix};
pub use postfix::to_postfix;
pub use tokenizer::{Token, format_tokens, tokenize};
