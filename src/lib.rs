//! A scientific expression calculator.
//!
//! The core is [`evaluate`]: a tokenizer, a shunting-yard infix to postfix
//! converter and a postfix stack evaluator over fixed operator, function
//! and constant tables. It is a pure function and safe to call from any
//! thread.
//!
//! ```
//! assert_eq!(infixcalc::evaluate("2^3^2").unwrap(), 512.0);
//! assert_eq!(infixcalc::evaluate("-2^2").unwrap(), -4.0);
//! ```
//!
//! [`calculator::evaluate_expression`], [`history`], [`session`] and
//! [`config`] are the caller-side pieces used by the `infixcalc` binary.

pub mod calculator;
pub mod config;
pub mod history;
pub mod session;

pub use calculator::{ErrorKind, EvalError, evaluate};
