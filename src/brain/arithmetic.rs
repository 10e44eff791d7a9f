//! Spoken arithmetic: `<number> <operator> <number>`

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Operands are decimals, optionally comma-grouped (`1,000`) or dot-led
/// (`.5`); operator words are tried longest first. The left operand must not
/// follow a digit, comma or dot, so `10,00` is not read as `00`.
static EXPRESSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^\d.,])(?P<lhs>-?(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+))\s*(?P<op>multiplied by|divided by|added to|subtract|multiply|minus|times|plus|less|over|add|[-+*/x])\s*(?P<rhs>-?(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+))",
    )
    .expect("valid regex")
});

fn operand(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}

/// Binary operator of a spoken expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Parse an operator word or symbol
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim() {
            "plus" | "add" | "added to" | "+" => Some(Self::Add),
            "minus" | "subtract" | "less" | "-" => Some(Self::Subtract),
            "times" | "multiply" | "multiplied by" | "x" | "*" => Some(Self::Multiply),
            "divided by" | "over" | "/" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Apply with IEEE-754 semantics (`1 / 0` is `inf`, `0 / 0` is `NaN`)
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

/// A parsed two-operand expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression {
    pub lhs: f64,
    pub op: Operator,
    pub rhs: f64,
}

impl Expression {
    /// Find the first expression in normalized text
    #[must_use]
    pub fn find(text: &str) -> Option<Self> {
        let caps = EXPRESSION_REGEX.captures(text)?;
        Some(Self {
            lhs: operand(&caps["lhs"])?,
            op: Operator::parse(&caps["op"])?,
            rhs: operand(&caps["rhs"])?,
        })
    }

    #[must_use]
    pub fn evaluate(&self) -> f64 {
        self.op.apply(self.lhs, self.rhs)
    }
}

/// Number rendered the way the web UI prints numbers
///
/// Fixed notation for magnitudes in `[1e-6, 1e21)`, otherwise exponent form
/// with a signed exponent (`1e+21`, `2.5e-7`).
#[derive(Debug, Clone, Copy)]
pub struct Number(pub f64);

impl fmt::Display for Number {
    #[allow(clippy::float_cmp)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            f.write_str("NaN")
        } else if value.is_infinite() {
            f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
        } else if value == 0.0 {
            // also covers -0
            f.write_str("0")
        } else if (1e-6..1e21).contains(&value.abs()) {
            write!(f, "{value}")
        } else {
            // `{:e}` gives the shortest mantissa; only the exponent sign differs
            let exp = format!("{value:e}");
            match exp.split_once('e') {
                Some((mantissa, power)) if !power.starts_with('-') => {
                    write!(f, "{mantissa}e+{power}")
                }
                _ => f.write_str(&exp),
            }
        }
    }
}
