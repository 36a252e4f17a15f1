//! Binary numeric operations used by computed vectors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A binary operation between two numeric operands.
///
/// Serialized as its symbol (`"+"`, `"-"`, ...) to match saved panel configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperation {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "^")]
    Power,
}

impl BinaryOperation {
    /// Get all operations, in picker order.
    pub fn all() -> &'static [BinaryOperation] {
        &[
            BinaryOperation::Add,
            BinaryOperation::Subtract,
            BinaryOperation::Multiply,
            BinaryOperation::Divide,
            BinaryOperation::Modulo,
            BinaryOperation::Power,
        ]
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperation::Add => "+",
            BinaryOperation::Subtract => "-",
            BinaryOperation::Multiply => "*",
            BinaryOperation::Divide => "/",
            BinaryOperation::Modulo => "%",
            BinaryOperation::Power => "^",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BinaryOperation::Add => "Add",
            BinaryOperation::Subtract => "Subtract",
            BinaryOperation::Multiply => "Multiply",
            BinaryOperation::Divide => "Divide",
            BinaryOperation::Modulo => "Modulo",
            BinaryOperation::Power => "Power",
        }
    }

    /// Look up an operation by its symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.symbol() == symbol)
    }

    /// Apply the operation. Division by zero follows IEEE-754 (`inf` / `NaN`).
    #[inline]
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperation::Add => left + right,
            BinaryOperation::Subtract => left - right,
            BinaryOperation::Multiply => left * right,
            BinaryOperation::Divide => left / right,
            BinaryOperation::Modulo => left % right,
            BinaryOperation::Power => left.powf(right),
        }
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
