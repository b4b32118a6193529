//! Call-stack tracking for the evaluator.
//!
//! - `CallStack`: live call frames, pushed and popped around every call
//! - `CallFrame`: per-call metadata (function, source, call site)
//!
//! `CallStack` snapshots into an `EvalBacktrace` at error sites. The raise
//! path renders its traceback from that snapshot.

use std::sync::Arc;

use blade_ir::SourceLocation;
use blade_value::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError};

/// A single frame in the live call stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFrame {
    /// Function name (`:program` for top-level code).
    pub function: Arc<str>,
    /// Source the function was defined in.
    pub source: Arc<str>,
    /// Where this frame was called from, inside the caller. `None` for the
    /// outermost frame.
    pub call_site: Option<SourceLocation>,
}

impl CallFrame {
    pub fn new(function: Arc<str>, source: Arc<str>, call_site: Option<SourceLocation>) -> Self {
        CallFrame {
            function,
            source,
            call_site,
        }
    }
}

/// Live call stack for the interpreter.
///
/// Each call pushes a frame and pops it on return; the depth check is part
/// of `push()`.
///
/// ```ignore
/// let mut stack = CallStack::new(Some(200));
/// stack.push(CallFrame::new(name, source, Some(location)))?;
/// // ... evaluate function body ...
/// stack.pop();
/// ```
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// Create an empty call stack. `None` means unlimited depth.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(self.attach_backtrace(recursion_limit_exceeded(max), None));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent call frame.
    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// The current (most recent) call frame, if any.
    #[inline]
    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Snapshot the stack, innermost first.
    ///
    /// The innermost frame is paired with `location` (where execution is
    /// now); every outer frame with the call site recorded by the frame it
    /// called.
    pub fn capture(&self, location: Option<SourceLocation>) -> EvalBacktrace {
        let mut frames = Vec::with_capacity(self.frames.len());
        let mut at = location;
        for frame in self.frames.iter().rev() {
            frames.push(BacktraceFrame {
                function: frame.function.to_string(),
                source: frame.source.to_string(),
                location: at,
            });
            at = frame.call_site;
        }
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace to `err` unless it already carries one.
    pub fn attach_backtrace(&self, err: EvalError, location: Option<SourceLocation>) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture(location))
    }
}

impl Default for CallStack {
    /// An unlimited call stack (native `Interpret` mode default).
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests;
