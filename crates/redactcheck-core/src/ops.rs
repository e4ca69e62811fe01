//! Version-agnostic draw-operator shapes.
//!
//! The rectangle reconstructor must not depend on any particular PDF codec's
//! operator naming or numbering, so the access layer lowers content streams
//! into this minimal typed view and the reconstructor branches purely on
//! argument *shapes* (lengths and element kinds). Operator names are carried
//! for diagnostics only.

/// A single typed argument of a draw operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A numeric operand (integers widened to f64).
    Num(f64),
    /// A string operand (PDF names and strings, stringified).
    Str(String),
    /// A nested array operand.
    Array(Vec<ArgValue>),
}

impl ArgValue {
    /// The numeric value, if this argument is a number.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            ArgValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, if this argument is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The nested array, if this argument is an array.
    pub fn as_array(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// One lowered drawing operator: a diagnostic name plus typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    /// Operator name as reported by the access layer. Diagnostic only —
    /// consumers match on argument shapes, never on this.
    pub name: String,
    /// Typed arguments.
    pub args: Vec<ArgValue>,
}

impl DrawOp {
    /// Create a draw operator.
    pub fn new(name: impl Into<String>, args: Vec<ArgValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// All arguments as numbers, if every argument is numeric.
    pub fn numeric_args(&self) -> Option<Vec<f64>> {
        self.args.iter().map(ArgValue::as_num).collect()
    }
}
