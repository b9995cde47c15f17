//! Interactive calculator session.
//!
//! Owns the state that lives across input lines: the history, a memory
//! register and input spliced in by `:mr` or `:recall`. Lines starting with
//! `:` are commands, everything else is evaluated.

use tracing::debug;

use crate::calculator::{
    CalcResult, DisplayOptions, auto_close_parentheses, evaluate_expression, format_display,
    format_tokens, looks_like_expression, to_postfix, tokenize,
};
use crate::history::{History, HistoryError};

/// Commands understood by [`Session::handle_line`].
pub const COMMANDS_HELP: &str = "Commands: :mc :mr :m+ [EXPR] :m- [EXPR] :recall N :history :clear :help :quit";

/// A single stored value, empty until something is added to it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Memory {
    value: Option<f64>,
}

impl Memory {
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// The stored value, if anything has been stored since the last clear.
    pub fn recall(&self) -> Option<f64> {
        self.value
    }

    /// Add to the stored value. An empty register counts as zero.
    pub fn add(&mut self, value: f64) {
        self.value = Some(self.value.unwrap_or(0.0) + value);
    }

    pub fn subtract(&mut self, value: f64) {
        self.add(-value);
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// What the caller should do after a line was handled.
#[derive(Debug)]
pub enum Reply {
    /// Nothing to show.
    Silent,
    /// An expression was evaluated.
    Calculated {
        result: CalcResult,
        /// Postfix form, when enabled and the expression converts.
        postfix: Option<String>,
    },
    /// Informational text for the user.
    Message(String),
    /// End the session.
    Quit,
}

pub struct Session {
    options: DisplayOptions,
    history: History,
    record: bool,
    show_postfix: bool,
    memory: Memory,
    pending: String,
    last_success: Option<CalcResult>,
}

impl Session {
    pub fn new(options: DisplayOptions, history: History) -> Self {
        Self {
            options,
            history,
            record: true,
            show_postfix: false,
            memory: Memory::default(),
            pending: String::new(),
            last_success: None,
        }
    }

    /// Whether successful results are added to the history.
    pub fn recording(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    /// Whether [`Reply::Calculated`] carries the postfix form.
    pub fn show_postfix(mut self, show: bool) -> Self {
        self.show_postfix = show;
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Input spliced in by `:mr` or `:recall`, prepended to the next line.
    pub fn pending_input(&self) -> &str {
        &self.pending
    }

    /// Clipboard text of the last successful result.
    pub fn last_clipboard(&self) -> Option<&str> {
        self.last_success.as_ref().and_then(CalcResult::clipboard)
    }

    /// Prompt for the next line: `M` marks a set memory register and any
    /// pending input is shown after the marker.
    pub fn prompt(&self) -> String {
        let marker = if self.memory.is_set() { "M" } else { "" };
        format!("{}> {}", marker, self.pending)
    }

    /// Evaluate `input` after any pending input, and record the result.
    pub fn calculate(&mut self, input: &str) -> CalcResult {
        let expression = format!("{}{}", std::mem::take(&mut self.pending), input.trim());
        let result = evaluate_expression(&expression, &self.options);

        if result.is_success() {
            if self.record {
                self.history.record(&result);
            }
            self.last_success = Some(result.clone());
        }
        result
    }

    /// Postfix form of `expression` as it would be evaluated, so dangling
    /// parentheses are closed first when the display options say so.
    pub fn postfix(&self, expression: &str) -> Option<String> {
        let expression = expression.trim();
        let source = if self.options.auto_close_parentheses {
            auto_close_parentheses(expression)
        } else {
            expression.to_string()
        };

        match tokenize(&source).and_then(|tokens| to_postfix(&tokens)) {
            Ok(postfix) => Some(format_tokens(&postfix)),
            Err(e) => {
                debug!(expression = %source, error = %e, "no postfix form");
                None
            }
        }
    }

    /// Handle one line of interactive input.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let input = line.trim();

        if let Some(command) = input.strip_prefix(':') {
            return self.run_command(command);
        }
        if input.is_empty() && self.pending.is_empty() {
            return Reply::Silent;
        }

        let postfix = self
            .show_postfix
            .then(|| self.postfix(&format!("{}{}", self.pending, input)))
            .flatten();
        let result = self.calculate(input);
        Reply::Calculated { result, postfix }
    }

    /// Annotate a line of text: expressions get ` = result` appended, any
    /// other line comes back unchanged.
    pub fn annotate_line(&mut self, line: &str) -> String {
        if !looks_like_expression(line) {
            return line.to_string();
        }
        let result = self.calculate(line);
        format!("{} = {}", line.trim_end(), result.display())
    }

    /// Persist the history, unless recording is off.
    pub fn save_history(&self) -> Result<(), HistoryError> {
        if !self.record {
            return Ok(());
        }
        self.history.save()
    }

    fn run_command(&mut self, command: &str) -> Reply {
        let (name, args) = match command.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (command, ""),
        };

        match name {
            "quit" | "q" => Reply::Quit,
            "help" | "h" => Reply::Message(COMMANDS_HELP.to_string()),
            "history" => Reply::Message(format_history(&self.history)),
            "clear" => {
                self.history.clear();
                Reply::Message("History cleared".to_string())
            }
            "mc" => {
                self.memory.clear();
                Reply::Message("Memory cleared".to_string())
            }
            "mr" => match self.memory.recall() {
                Some(value) => self.splice(value),
                None => Reply::Message("Memory is empty".to_string()),
            },
            "m+" => self.update_memory(args, Memory::add),
            "m-" => self.update_memory(args, Memory::subtract),
            "recall" => self.recall(args),
            _ => Reply::Message(format!("Unknown command: :{}", name)),
        }
    }

    /// Apply `op` with the value of `args`, or with the last result when no
    /// expression is given. Errors leave the register untouched.
    fn update_memory(&mut self, args: &str, op: fn(&mut Memory, f64)) -> Reply {
        let value = if args.is_empty() {
            match self.last_success.as_ref().and_then(CalcResult::value) {
                Some(value) => value,
                None => return Reply::Message("No result to store".to_string()),
            }
        } else {
            let result = evaluate_expression(args, &self.options);
            match result.value() {
                Some(value) => value,
                None => return Reply::Message(format!("Error: {}", result.display())),
            }
        };

        op(&mut self.memory, value);
        let stored = self.memory.recall().unwrap_or_default();
        let shown = format_display(stored, self.options.thousands_separator)
            .unwrap_or_else(|| stored.to_string());
        Reply::Message(format!("Memory: {}", shown))
    }

    /// `:recall N` splices the value of the N-th history entry, counted
    /// from 1 as `:history` lists them.
    fn recall(&mut self, args: &str) -> Reply {
        let Ok(number) = args.parse::<usize>() else {
            return Reply::Message("Usage: :recall N".to_string());
        };
        let value = number
            .checked_sub(1)
            .and_then(|index| self.history.get(index))
            .map(|entry| entry.value);

        match value {
            Some(value) => self.splice(value),
            None => Reply::Message(format!("No history entry {}", number)),
        }
    }

    fn splice(&mut self, value: f64) -> Reply {
        self.pending.push_str(&splice_literal(value));
        Reply::Message(format!("Input: {}", self.pending))
    }
}

/// Render a value so it reads back as one operand wherever it is spliced.
/// Negative values are parenthesised so `2*` followed by `-3` stays a
/// product.
fn splice_literal(value: f64) -> String {
    if value.is_sign_negative() {
        format!("({})", value)
    } else {
        value.to_string()
    }
}

/// One line per entry, numbered from 1, newest first.
pub fn format_history(history: &History) -> String {
    if history.is_empty() {
        return "No history yet".to_string();
    }
    history
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| format!("{:>3}  {} = {}", index + 1, entry.expression, entry.result))
        .collect::<Vec<_>>()
        .join("\n")
}
