//! Blade Value - runtime values and errors for the Blade interpreter.
//!
//! - `Value`: the closed tagged union every evaluator component shares
//! - `ObjectRef` / `ClassRef`: structured objects with identity semantics
//! - `EvalError` / `EvalErrorKind`: structured runtime errors with an
//!   optional call-stack backtrace

mod errors;
mod value;

pub use errors::{
    arity_mismatch, invalid_code_point, negative_count, raised, recursion_limit_exceeded,
    size_out_of_bounds, unsupported_operands, BacktraceFrame, ErrorCategory, EvalBacktrace,
    EvalError, EvalErrorKind, EvalResult,
};
pub use value::{CallableValue, ClassRef, Heap, ObjectRef, Value};
