//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use super::Interpreter;
use crate::builtins::BuiltinContext;
use crate::diagnostics::CallStack;
use crate::eval_mode::EvalMode;
use crate::link::LinkedProgram;
use crate::print_handler::SharedPrintHandler;

/// Builder for creating Interpreter instances with various configurations.
///
/// The default mode is `Interpret`; callers pick the mode for their
/// context:
/// - `EvalMode::Interpret` for running scripts
/// - `EvalMode::TestRun` for test harnesses (captured output)
/// - `EvalMode::Bounded { .. }` for embedders that need a depth limit
pub struct InterpreterBuilder<'p> {
    program: &'p LinkedProgram,
    mode: EvalMode,
    print_handler: Option<SharedPrintHandler>,
    call_stack: Option<CallStack>,
}

impl<'p> InterpreterBuilder<'p> {
    /// Create a new builder with default `Interpret` mode.
    pub fn new(program: &'p LinkedProgram) -> Self {
        Self {
            program,
            mode: EvalMode::default(),
            print_handler: None,
            call_stack: None,
        }
    }

    /// Set the evaluation mode.
    ///
    /// Controls the recursion limit and the default print handler.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the print handler used by `print`.
    ///
    /// Overrides the mode-based default.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set the call stack, overriding the mode's depth limit.
    #[must_use]
    pub fn call_stack(mut self, stack: CallStack) -> Self {
        self.call_stack = Some(stack);
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter<'p> {
        let print_handler = self
            .print_handler
            .unwrap_or_else(|| self.mode.default_print_handler());
        let call_stack = self
            .call_stack
            .unwrap_or_else(|| CallStack::new(self.mode.max_recursion_depth()));
        let ctx = BuiltinContext::new(print_handler.clone());

        Interpreter {
            program: self.program,
            mode: self.mode,
            print_handler,
            call_stack,
            ctx,
        }
    }
}
