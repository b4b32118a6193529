//! Tree-walking interpreter over a `LinkedProgram`.
//!
//! # Architecture
//!
//! - Statements run in order; `Return` stops the body with a value.
//! - Binary operator nodes delegate to their own `OperatorSite`.
//! - Local reads and writes go through the function's `SlotTable` and the
//!   activation's `Frame`.
//! - Calls push a `CallFrame`; errors leaving a call carry a backtrace
//!   captured at the innermost failing location.
//! - `raise` builds its error from the live call stack and unwinds as `Err`.

mod builder;

use blade_ir::SourceLocation;
use blade_value::{arity_mismatch, unsupported_operands, EvalError, EvalResult, ObjectRef, Value};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::builtins::BuiltinContext;
use crate::diagnostics::{CallFrame, CallStack};
use crate::eval_mode::EvalMode;
use crate::link::{CallTarget, CompiledFunction, LinkedProgram, Node, StmtNode};
use crate::print_handler::SharedPrintHandler;
use crate::raise::raise;
use crate::slots::Frame;
use crate::stack::ensure_sufficient_stack;

pub use builder::InterpreterBuilder;

/// Call arguments; most calls take few enough to stay inline.
type Args = SmallVec<[Value; 4]>;

/// Evaluator for one linked program.
pub struct Interpreter<'p> {
    program: &'p LinkedProgram,
    mode: EvalMode,
    print_handler: SharedPrintHandler,
    call_stack: CallStack,
    ctx: BuiltinContext,
}

impl<'p> Interpreter<'p> {
    /// Create an interpreter with the default `Interpret` mode.
    pub fn new(program: &'p LinkedProgram) -> Self {
        InterpreterBuilder::new(program).build()
    }

    #[inline]
    pub fn mode(&self) -> &EvalMode {
        &self.mode
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    #[inline]
    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    /// Run the top-level body. Returns the value of a top-level `return`,
    /// nil otherwise.
    #[tracing::instrument(level = "debug", skip_all, fields(source = %self.program.source()))]
    pub fn run(&mut self) -> EvalResult {
        let main = self.program.main();
        self.enter(main, Args::new(), None)
    }

    /// Call a user function by name from outside the program.
    ///
    /// Returns `None` when the program defines no such function.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Option<EvalResult> {
        let function = self.program.function(name)?;
        Some(self.call_user(function, args.iter().cloned().collect(), None))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name()))]
    fn call_user(
        &mut self,
        function: &'p CompiledFunction,
        args: Args,
        location: Option<SourceLocation>,
    ) -> EvalResult {
        if args.len() != function.arity() {
            let err = arity_mismatch(function.name(), function.arity(), args.len());
            return Err(self.call_stack.attach_backtrace(err, location));
        }
        self.enter(function, args, location)
    }

    /// Push a frame for `function`, bind `args` and run its body.
    fn enter(
        &mut self,
        function: &'p CompiledFunction,
        args: Args,
        call_site: Option<SourceLocation>,
    ) -> EvalResult {
        self.call_stack.push(CallFrame::new(
            function.name().clone(),
            function.source().clone(),
            call_site,
        ))?;

        let mut frame = function.slots().new_frame();
        for (&slot, value) in function.params().iter().zip(args) {
            function.slots().assign(&mut frame, slot, value);
        }

        let result = ensure_sufficient_stack(|| self.exec_body(function, &mut frame));
        self.call_stack.pop();
        result.map(|value| value.unwrap_or(Value::Nil))
    }

    fn exec_body(
        &mut self,
        function: &'p CompiledFunction,
        frame: &mut Frame,
    ) -> Result<Option<Value>, EvalError> {
        for stmt in function.body() {
            if let Some(value) = self.exec(function, frame, stmt)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Execute one statement; `Some` means the function returned.
    fn exec(
        &mut self,
        function: &'p CompiledFunction,
        frame: &mut Frame,
        stmt: &'p StmtNode,
    ) -> Result<Option<Value>, EvalError> {
        match stmt {
            StmtNode::Expr(expr) => {
                self.eval(function, frame, expr)?;
            }
            StmtNode::Assign { slot, value } => {
                let value = self.eval(function, frame, value)?;
                function.slots().assign(frame, *slot, value);
            }
            StmtNode::SetField {
                object,
                field,
                value,
            } => {
                let target = self.eval(function, frame, object)?;
                let value = self.eval(function, frame, value)?;
                match target {
                    Value::Object(target) => target.set(field.as_str(), value),
                    other => return Err(self.fail(field_error(field, &other), None)),
                }
            }
            StmtNode::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(function, frame, expr)?,
                    None => Value::Nil,
                };
                return Ok(Some(value));
            }
            StmtNode::Raise { value, location } => {
                let value = self.eval(function, frame, value)?;
                return Err(raise(value, *location, &self.call_stack));
            }
        }
        Ok(None)
    }

    fn eval(
        &mut self,
        function: &'p CompiledFunction,
        frame: &mut Frame,
        node: &'p Node,
    ) -> EvalResult {
        match node {
            Node::Const(value) => Ok(value.clone()),
            Node::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.eval(function, frame, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(items))
            }
            Node::Local(slot) => Ok(function.slots().read(frame, *slot)),
            Node::Binary { left, right, site } => {
                let left = self.eval(function, frame, left)?;
                let right = self.eval(function, frame, right)?;
                site.evaluate(left, right).map_err(|err| self.fail(err, None))
            }
            Node::Call {
                target,
                args,
                location,
            } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(function, frame, arg))
                    .collect::<Result<Args, _>>()?;
                match target {
                    CallTarget::User(index) => {
                        let callee = self.program.function_at(*index);
                        self.call_user(callee, args, Some(*location))
                    }
                    CallTarget::Builtin(instance) => instance
                        .invoke(&self.ctx, &args)
                        .map_err(|err| self.fail(err, Some(*location))),
                }
            }
            Node::New { class, fields } => {
                let mut map = FxHashMap::default();
                for (name, value) in fields {
                    let value = self.eval(function, frame, value)?;
                    map.insert(name.clone(), value);
                }
                Ok(Value::object(ObjectRef::with_fields(class.clone(), map)))
            }
            Node::Field { object, field } => match self.eval(function, frame, object)? {
                Value::Object(object) => Ok(object.get_or(field, Value::Nil)),
                other => Err(self.fail(field_error(field, &other), None)),
            },
        }
    }

    /// Attach the current call stack to an error raised at `location`.
    #[cold]
    fn fail(&self, err: EvalError, location: Option<SourceLocation>) -> EvalError {
        self.call_stack.attach_backtrace(err, location)
    }
}

#[cold]
fn field_error(field: &str, target: &Value) -> EvalError {
    unsupported_operands(&format!(".{field}"), &[target])
}
