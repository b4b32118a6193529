//! The `raise` statement: error construction and traceback rendering.
//!
//! Raising a structured object decomposes it into a type (its class name)
//! and a message (its `message` field), renders a traceback from the call
//! stack and stores it on the object under `stacktrace`. The field is only
//! ever defined once, so re-raising an object keeps the traceback of the
//! first raise.
//!
//! Traceback format:
//!
//! ```text
//! ValueError: bad input
//!     at main.b:4:5 -> check()
//!     at main.b:9:1 -> @.script()
//! ```
//!
//! (each frame line starts with a tab; the top-level program renders as
//! `@.script()`).

use blade_ir::{SourceLocation, PROGRAM_FUNCTION_NAME};
use blade_value::{raised, EvalBacktrace, EvalError, Value};

use crate::diagnostics::CallStack;

/// Field a raised object's traceback is stored under.
pub const STACKTRACE_FIELD: &str = "stacktrace";

/// Field holding a raised object's message.
pub const MESSAGE_FIELD: &str = "message";

/// Name the top-level program renders as in tracebacks.
pub const SCRIPT_FRAME_NAME: &str = "@.script";

/// Build the error for `raise value` at `location`. Always unwinds: the
/// caller returns the result as `Err`.
#[tracing::instrument(level = "debug", skip_all, fields(%location))]
pub fn raise(value: Value, location: SourceLocation, call_stack: &CallStack) -> EvalError {
    let backtrace = call_stack.capture(Some(location));
    let Value::Object(object) = &value else {
        tracing::debug!(raised = %value, "raising non-object value");
        return raised(None, &value.display_value(), value.clone()).with_backtrace(backtrace);
    };

    let type_name = object.class_name().to_string();
    let message = match object.get_or(MESSAGE_FIELD, Value::Nil) {
        Value::Nil => String::new(),
        other => other.display_value(),
    };

    let rendered = render_traceback(Some(&header(&type_name, &message)), &backtrace);
    let traceback = if object.define_once(STACKTRACE_FIELD, Value::string(rendered.clone())) {
        rendered
    } else {
        object
            .get(STACKTRACE_FIELD)
            .map_or(rendered, |existing| existing.display_value())
    };

    raised(Some(&type_name), &message, value.clone())
        .with_backtrace(backtrace)
        .with_traceback(traceback)
}

/// `"<type>: <message>"`, or just `"<type>"` without a message.
pub fn header(type_name: &str, message: &str) -> String {
    if message.is_empty() {
        type_name.to_string()
    } else {
        format!("{type_name}: {message}")
    }
}

/// Render `backtrace` (innermost first) below an optional header line.
pub fn render_traceback(header: Option<&str>, backtrace: &EvalBacktrace) -> String {
    let mut out = header.unwrap_or_default().to_string();
    for frame in backtrace.frames() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("\tat ");
        out.push_str(&frame.source);
        if let Some(location) = frame.location {
            out.push(':');
            out.push_str(&location.to_string());
        }
        out.push_str(" -> ");
        if frame.function == PROGRAM_FUNCTION_NAME {
            out.push_str(SCRIPT_FRAME_NAME);
        } else {
            out.push_str(&frame.function);
        }
        out.push_str("()");
    }
    out
}

#[cfg(test)]
mod tests;
