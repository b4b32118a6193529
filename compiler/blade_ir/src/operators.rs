//! Binary operators that go through specializing dispatch.

use std::fmt;

/// Binary operator kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Mul,
    Div,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Human-readable operation name, used in tracing output.
    pub const fn operation_name(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Mul => "multiplication",
            Self::Div => "division",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols() {
        assert_eq!(BinaryOp::Add.as_symbol(), "+");
        assert_eq!(BinaryOp::Mul.as_symbol(), "*");
        assert_eq!(BinaryOp::Div.as_symbol(), "/");
        assert_eq!(BinaryOp::Div.to_string(), "/");
    }
}
