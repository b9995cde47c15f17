//! Presentation of evaluation results.
//!
//! Wraps [`evaluate`](super::evaluate) with the pre- and post-processing a
//! calculator front end performs: closing dangling parentheses and turning
//! the raw value into display and clipboard strings.

use tracing::debug;

use super::error::ErrorKind;
use super::evaluation::evaluate;

/// Options controlling how results are presented.
#[derive(Clone, Copy, Debug)]
pub struct DisplayOptions {
    /// Group the integer part in thousands (`1,000,000`).
    pub thousands_separator: bool,
    /// Append missing `)` before evaluating.
    pub auto_close_parentheses: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            thousands_separator: false,
            auto_close_parentheses: true,
        }
    }
}

/// Outcome of [`evaluate_expression`], ready to be shown to a user.
///
/// Non-finite values are reported as `Error` with no [`ErrorKind`], since
/// the core considers them successful evaluations.
#[derive(Clone, Debug)]
pub enum CalcResult {
    Success {
        /// Trimmed input, before any parentheses were closed.
        expression: String,
        value: f64,
        /// Honours [`DisplayOptions::thousands_separator`].
        display_result: String,
        /// Always ungrouped so it pastes back as a valid literal.
        clipboard_result: String,
    },
    Error {
        expression: String,
        message: String,
        kind: Option<ErrorKind>,
    },
}

impl CalcResult {
    pub fn expression(&self) -> &str {
        let (Self::Success { expression, .. } | Self::Error { expression, .. }) = self;
        expression
    }

    pub fn is_success(&self) -> bool {
        self.value().is_some()
    }

    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Success { value, .. } => Some(value),
            Self::Error { .. } => None,
        }
    }

    /// The formatted value, or the error message.
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { message, .. } => message,
        }
    }

    pub fn clipboard(&self) -> Option<&str> {
        match self {
            Self::Success {
                clipboard_result, ..
            } => Some(clipboard_result),
            Self::Error { .. } => None,
        }
    }

    /// `None` on success and for non-finite values.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match *self {
            Self::Error { kind, .. } => kind,
            Self::Success { .. } => None,
        }
    }
}

/// Evaluate an expression and format the outcome.
pub fn evaluate_expression(input: &str, options: &DisplayOptions) -> CalcResult {
    let expression = input.trim().to_string();

    let source = if options.auto_close_parentheses {
        auto_close_parentheses(&expression)
    } else {
        expression.clone()
    };

    match evaluate(&source) {
        Ok(value) if value.is_nan() => CalcResult::Error {
            expression,
            message: "Not a Number".to_string(),
            kind: None,
        },
        Ok(value) if value.is_infinite() => {
            let msg = if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            CalcResult::Error {
                expression,
                message: msg.to_string(),
                kind: None,
            }
        }
        Ok(value) => CalcResult::Success {
            expression,
            display_result: format_number(value, options.thousands_separator),
            clipboard_result: format_number(value, false),
            value,
        },
        Err(err) => {
            debug!(%expression, error = %err, "evaluation failed");
            CalcResult::Error {
                expression,
                message: err.to_string(),
                kind: Some(err.kind()),
            }
        }
    }
}

/// Append one `)` for every `(` left open.
pub fn auto_close_parentheses(expression: &str) -> String {
    let open = expression.matches('(').count();
    let close = expression.matches(')').count();

    let mut closed = expression.to_string();
    if open > close {
        closed.push_str(&")".repeat(open - close));
    }
    closed
}

/// Format a number for display. Returns `None` for NaN and infinities.
pub fn format_display(value: f64, thousands_separator: bool) -> Option<String> {
    value
        .is_finite()
        .then(|| format_number(value, thousands_separator))
}

/// Format a number for clipboard (raw number, no separators).
pub fn format_clipboard(value: f64) -> Option<String> {
    format_display(value, false)
}

fn format_number(value: f64, thousands_separator: bool) -> String {
    let abs = value.abs();
    let plain = if value.fract() == 0.0 && abs < 1e15 {
        // Exact in i64 below 1e15.
        (value as i64).to_string()
    } else if abs < 1e-4 || abs >= 1e10 {
        return format_exponential(value);
    } else {
        format_significant(value, 10)
    };

    if thousands_separator {
        group_thousands(&plain)
    } else {
        plain
    }
}

/// Exponential notation with 6 fractional digits and a signed exponent,
/// e.g. `1.234568e+10`.
fn format_exponential(value: f64) -> String {
    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Round to `digits` significant digits and trim trailing zeros.
fn format_significant(value: f64, digits: i32) -> String {
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let formatted = format!("{:.*}", decimals, value);

    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Insert `,` between digit triples of the integer part of a plain
/// decimal string. The sign and fractional part are left as they are.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = unsigned.split_at(unsigned.find('.').unwrap_or(unsigned.len()));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> DisplayOptions {
        DisplayOptions::default()
    }

    #[test]
    fn test_basic_evaluation() {
        let result = evaluate_expression("2 + 2", &plain());
        assert!(result.is_success());
        assert_eq!(result.display(), "4");
        assert_eq!(result.clipboard(), Some("4"));
        assert_eq!(result.value(), Some(4.0));
    }

    #[test]
    fn test_thousand_separators() {
        let options = DisplayOptions {
            thousands_separator: true,
            ..DisplayOptions::default()
        };
        let result = evaluate_expression("1000 * 1000", &options);
        assert_eq!(result.display(), "1,000,000");
        assert_eq!(result.clipboard(), Some("1000000"));

        let result = evaluate_expression("-1234567/2", &options);
        assert_eq!(result.display(), "-617,283.5");
        assert_eq!(result.clipboard(), Some("-617283.5"));
    }

    #[test]
    fn test_decimal_result() {
        let result = evaluate_expression("1 / 3", &plain());
        assert_eq!(result.display(), "0.3333333333");
        let result = evaluate_expression("2*pi", &plain());
        assert_eq!(result.display(), "6.283185307");
        let result = evaluate_expression("0.1+0.2", &plain());
        assert_eq!(result.display(), "0.3");
    }

    #[test]
    fn test_exponential_result() {
        assert_eq!(format_display(12345678901.5, false).unwrap(), "1.234568e+10");
        assert_eq!(format_display(0.00001234, false).unwrap(), "1.234000e-5");
        assert_eq!(format_display(1e15, false).unwrap(), "1.000000e+15");
        assert_eq!(format_display(-0.00005, false).unwrap(), "-5.000000e-5");
    }

    #[test]
    fn test_integer_result() {
        assert_eq!(format_display(0.0, false).unwrap(), "0");
        assert_eq!(format_display(-42.0, false).unwrap(), "-42");
        assert_eq!(format_display(999999999999999.0, true).unwrap(), "999,999,999,999,999");
    }

    #[test]
    fn test_non_finite_values() {
        assert_eq!(format_display(f64::NAN, false), None);
        assert_eq!(format_clipboard(f64::INFINITY), None);

        let result = evaluate_expression("10^400", &plain());
        assert!(!result.is_success());
        assert_eq!(result.display(), "Infinity");
        assert_eq!(result.error_kind(), None);

        let result = evaluate_expression("5%0", &plain());
        assert_eq!(result.display(), "Not a Number");
    }

    #[test]
    fn test_errors_carry_kind() {
        let result = evaluate_expression("1 / 0", &plain());
        assert!(!result.is_success());
        assert_eq!(result.display(), "Division by zero");
        assert_eq!(result.error_kind(), Some(ErrorKind::DivisionByZero));
        assert_eq!(result.clipboard(), None);

        let result = evaluate_expression("   ", &plain());
        assert_eq!(result.error_kind(), Some(ErrorKind::EmptyExpression));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("-123456.789"), "-123,456.789");
        assert_eq!(group_thousands("-0.5"), "-0.5");
    }

    #[test]
    fn test_auto_close_parentheses() {
        assert_eq!(auto_close_parentheses("sqrt(16"), "sqrt(16)");
        assert_eq!(auto_close_parentheses("((1+2"), "((1+2))");
        assert_eq!(auto_close_parentheses("(1))"), "(1))");

        let result = evaluate_expression("sqrt(16", &plain());
        assert_eq!(result.display(), "4");
        // The recorded expression is what the user typed.
        assert_eq!(result.expression(), "sqrt(16");

        let strict = DisplayOptions {
            auto_close_parentheses: false,
            ..DisplayOptions::default()
        };
        let result = evaluate_expression("sqrt(16", &strict);
        assert_eq!(
            result.error_kind(),
            Some(ErrorKind::MismatchedParentheses)
        );
    }
}
