//! Static operator, function and constant tables.
//!
//! These are read-only for the lifetime of the process and consulted by
//! the tokenizer, the postfix converter and the evaluator.

use std::f64::consts;
use std::fmt;

/// Tie-break direction for operators of equal precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// A binary infix operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Precedence and associativity of an operator.
#[derive(Clone, Copy, Debug)]
pub struct OperatorSpec {
    pub operator: Operator,
    pub symbol: char,
    pub precedence: u8,
    pub associativity: Associativity,
}

pub static OPERATORS: [OperatorSpec; 6] = [
    OperatorSpec {
        operator: Operator::Add,
        symbol: '+',
        precedence: 2,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        operator: Operator::Sub,
        symbol: '-',
        precedence: 2,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        operator: Operator::Mul,
        symbol: '*',
        precedence: 3,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        operator: Operator::Div,
        symbol: '/',
        precedence: 3,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        operator: Operator::Rem,
        symbol: '%',
        precedence: 3,
        associativity: Associativity::Left,
    },
    OperatorSpec {
        operator: Operator::Pow,
        symbol: '^',
        precedence: 4,
        associativity: Associativity::Right,
    },
];

impl Operator {
    /// Look up the operator written as `symbol`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        OPERATORS
            .iter()
            .find(|spec| spec.symbol == symbol)
            .map(|spec| spec.operator)
    }

    /// Get the table entry for this operator.
    pub fn spec(self) -> &'static OperatorSpec {
        // The table holds one entry per variant, in declaration order.
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> char {
        self.spec().symbol
    }

    pub fn precedence(self) -> u8 {
        self.spec().precedence
    }

    pub fn associativity(self) -> Associativity {
        self.spec().associativity
    }

    /// Whether `top`, already on the operator stack, must be popped before
    /// `self` is pushed.
    pub fn yields_to(self, top: Operator) -> bool {
        match self.associativity() {
            Associativity::Left => self.precedence() <= top.precedence(),
            Associativity::Right => self.precedence() < top.precedence(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A unary named function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log,
    Ln,
    Sqrt,
    Cbrt,
    Abs,
    Exp,
}

/// Name, implementation and optional domain predicate of a function.
#[derive(Clone, Copy)]
pub struct FunctionSpec {
    pub function: Function,
    pub name: &'static str,
    pub apply: fn(f64) -> f64,
    /// Returns `false` for arguments outside the function's domain.
    pub domain: Option<fn(f64) -> bool>,
}

impl fmt::Debug for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSpec")
            .field("name", &self.name)
            .field("restricted", &self.domain.is_some())
            .finish()
    }
}

fn unit_interval(x: f64) -> bool {
    (-1.0..=1.0).contains(&x)
}

fn positive(x: f64) -> bool {
    x > 0.0
}

fn non_negative(x: f64) -> bool {
    x >= 0.0
}

/// Function table, in the order the tokenizer tries the names.
pub static FUNCTIONS: [FunctionSpec; 12] = [
    FunctionSpec {
        function: Function::Sin,
        name: "sin",
        apply: f64::sin,
        domain: None,
    },
    FunctionSpec {
        function: Function::Cos,
        name: "cos",
        apply: f64::cos,
        domain: None,
    },
    FunctionSpec {
        function: Function::Tan,
        name: "tan",
        apply: f64::tan,
        domain: None,
    },
    FunctionSpec {
        function: Function::Asin,
        name: "asin",
        apply: f64::asin,
        domain: Some(unit_interval),
    },
    FunctionSpec {
        function: Function::Acos,
        name: "acos",
        apply: f64::acos,
        domain: Some(unit_interval),
    },
    FunctionSpec {
        function: Function::Atan,
        name: "atan",
        apply: f64::atan,
        domain: None,
    },
    FunctionSpec {
        function: Function::Log,
        name: "log",
        apply: f64::log10,
        domain: Some(positive),
    },
    FunctionSpec {
        function: Function::Ln,
        name: "ln",
        apply: f64::ln,
        domain: Some(positive),
    },
    FunctionSpec {
        function: Function::Sqrt,
        name: "sqrt",
        apply: f64::sqrt,
        domain: Some(non_negative),
    },
    FunctionSpec {
        function: Function::Cbrt,
        name: "cbrt",
        apply: f64::cbrt,
        domain: None,
    },
    FunctionSpec {
        function: Function::Abs,
        name: "abs",
        apply: f64::abs,
        domain: None,
    },
    FunctionSpec {
        function: Function::Exp,
        name: "exp",
        apply: f64::exp,
        domain: None,
    },
];

impl Function {
    /// Get the table entry for this function.
    pub fn spec(self) -> &'static FunctionSpec {
        &FUNCTIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Whether `arg` lies inside this function's domain.
    pub fn accepts(self, arg: f64) -> bool {
        self.spec().domain.is_none_or(|predicate| predicate(arg))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    /// `π` and `pi` both spell [`Constant::Pi`].
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => consts::PI,
            Self::E => consts::E,
        }
    }

    /// Canonical spelling, used when printing tokens.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pi => "π",
            Self::E => "e",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
