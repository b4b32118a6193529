//! Runtime error types.
//!
//! `EvalErrorKind` provides typed error categories; the factory functions
//! (`unsupported_operands()`, `raised()`, ...) are the public constructors
//! and populate both `kind` and `message`.
//!
//! Arithmetic overflow never appears here: a checked operation that
//! overflows generalizes its call-site instead of failing.

use std::fmt;

use blade_ir::SourceLocation;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Coarse error class, as reported to embedders.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Operands or builtin arguments of the wrong type, count or range.
    Argument,
    /// A repetition whose result exceeds the size limits.
    Bounds,
    /// Raised by the program itself.
    Raised,
    /// Evaluation ran out of a resource (call depth).
    Resource,
}

/// Typed error category for structured diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Argument
    #[error("unsupported operand types for `{operation}`: {}", join_operands(.operands))]
    UnsupportedOperands {
        operation: String,
        operands: Vec<String>,
    },
    #[error("{name}() expects {expected} {}, got {got}", argument_word(*.expected))]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("`{operation}` cannot repeat a negative number of times ({count})")]
    NegativeCount { operation: String, count: i64 },
    #[error("{code} is not a valid code point")]
    InvalidCodePoint { code: i64 },

    // Bounds
    #[error("result of `{operation}` would have {size} {unit}, exceeding the limit of {limit}")]
    SizeOutOfBounds {
        operation: String,
        size: u128,
        limit: usize,
        /// What `size` counts: `"elements"` for lists, `"bytes"` for text.
        unit: &'static str,
    },

    // Raised
    #[error("{}", raised_header(.type_name.as_deref(), .message))]
    Raised {
        type_name: Option<String>,
        message: String,
    },

    // Resource
    #[error("maximum recursion depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },
}

impl EvalErrorKind {
    /// The coarse category of this kind.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedOperands { .. }
            | Self::ArityMismatch { .. }
            | Self::NegativeCount { .. }
            | Self::InvalidCodePoint { .. } => ErrorCategory::Argument,
            Self::SizeOutOfBounds { .. } => ErrorCategory::Bounds,
            Self::Raised { .. } => ErrorCategory::Raised,
            Self::StackOverflow { .. } => ErrorCategory::Resource,
        }
    }
}

fn join_operands(operands: &[String]) -> String {
    operands.join(" and ")
}

fn argument_word(count: usize) -> &'static str {
    if count == 1 {
        "argument"
    } else {
        "arguments"
    }
}

/// `"<type>: <message>"`, `"<type>"` when the message is empty, or the bare
/// message for untyped raises.
pub(crate) fn raised_header(type_name: Option<&str>, message: &str) -> String {
    match type_name {
        Some(name) if message.is_empty() => name.to_string(),
        Some(name) => format!("{name}: {message}"),
        None => message.to_string(),
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function name (`:program` for top-level code).
    pub function: String,
    /// Source name the function was loaded from.
    pub source: String,
    /// Position inside the function that was executing.
    pub location: Option<SourceLocation>,
}

/// Immutable snapshot of the call stack at an error site, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {} ({}", frame.function, frame.source)?;
            if let Some(location) = frame.location {
                write!(f, ":{location}")?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable error message; equals `kind.to_string()`.
    pub message: String,
    /// The value that was raised, for errors produced by `raise`.
    pub value: Option<Value>,
    /// Call stack at the error site.
    pub backtrace: Option<EvalBacktrace>,
    /// Rendered traceback text, for raises of structured objects.
    pub traceback: Option<String>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            value: None,
            backtrace: None,
            traceback: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_traceback(mut self, traceback: String) -> Self {
        self.traceback = Some(traceback);
        self
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Whether this error came from a `raise` statement.
    #[inline]
    pub fn is_raised(&self) -> bool {
        matches!(self.kind, EvalErrorKind::Raised { .. })
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

fn describe_operand(value: &Value) -> String {
    format!("{value} ({})", value.type_name())
}

// Factory functions

/// An operator or builtin received operands it has no strategy for.
#[cold]
pub fn unsupported_operands(operation: &str, operands: &[&Value]) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperands {
        operation: operation.to_string(),
        operands: operands.iter().map(|v| describe_operand(v)).collect(),
    })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn negative_count(operation: &str, count: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NegativeCount {
        operation: operation.to_string(),
        count,
    })
}

#[cold]
pub fn invalid_code_point(code: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidCodePoint { code })
}

/// A repetition result would exceed `limit`. `size` is computed without
/// overflow so the reported figure is exact.
#[cold]
pub fn size_out_of_bounds(
    operation: &str,
    size: u128,
    limit: usize,
    unit: &'static str,
) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SizeOutOfBounds {
        operation: operation.to_string(),
        size,
        limit,
        unit,
    })
}

/// A value raised by the program. The raised value is always attached.
#[cold]
pub fn raised(type_name: Option<&str>, message: &str, value: Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Raised {
        type_name: type_name.map(str::to_string),
        message: message.to_string(),
    })
    .with_value(value)
}

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth: limit })
}

#[cfg(test)]
mod tests;
