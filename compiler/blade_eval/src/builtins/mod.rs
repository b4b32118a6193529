//! Builtin functions.
//!
//! A builtin is declared by a `BuiltinEntry`: its name, whether it is
//! variadic, its arity, and a factory. The linker calls the factory once per
//! call-site, so every call expression owns its own `BuiltinFunction`
//! instance and may specialize on the arguments it sees.
//!
//! Declarations come from `BuiltinDeclarations` sources and are merged into
//! a `BuiltinRegistry` before any program is linked.

mod functions;
mod registry;

use std::fmt;

use blade_value::{arity_mismatch, EvalResult, Value};

use crate::print_handler::SharedPrintHandler;

pub use functions::CoreBuiltins;
pub use registry::BuiltinRegistry;

/// Runtime services available to builtins.
pub struct BuiltinContext {
    print_handler: SharedPrintHandler,
}

impl BuiltinContext {
    pub fn new(print_handler: SharedPrintHandler) -> Self {
        BuiltinContext { print_handler }
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }
}

/// A builtin implementation. One instance exists per call-site.
pub trait BuiltinFunction: Send + Sync {
    fn call(&self, ctx: &BuiltinContext, args: &[Value]) -> EvalResult;
}

/// Factory producing a fresh implementation for one call-site.
pub type BuiltinFactory = fn() -> Box<dyn BuiltinFunction>;

/// Declaration of one builtin.
#[derive(Clone, Copy)]
pub struct BuiltinEntry {
    pub name: &'static str,
    /// Variadic builtins accept any number of arguments.
    pub variadic: bool,
    /// Exact argument count for non-variadic builtins.
    pub arity: usize,
    pub factory: BuiltinFactory,
}

impl BuiltinEntry {
    pub const fn new(
        name: &'static str,
        variadic: bool,
        arity: usize,
        factory: BuiltinFactory,
    ) -> Self {
        BuiltinEntry {
            name,
            variadic,
            arity,
            factory,
        }
    }

    /// Create the implementation for a new call-site.
    pub fn instantiate(&self) -> BuiltinInstance {
        BuiltinInstance {
            name: self.name,
            variadic: self.variadic,
            arity: self.arity,
            function: (self.factory)(),
        }
    }
}

impl fmt::Debug for BuiltinEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinEntry")
            .field("name", &self.name)
            .field("variadic", &self.variadic)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A builtin bound to one call-site.
pub struct BuiltinInstance {
    name: &'static str,
    variadic: bool,
    arity: usize,
    function: Box<dyn BuiltinFunction>,
}

impl BuiltinInstance {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check the argument count and run the builtin.
    pub fn invoke(&self, ctx: &BuiltinContext, args: &[Value]) -> EvalResult {
        if !self.variadic && args.len() != self.arity {
            return Err(arity_mismatch(self.name, self.arity, args.len()));
        }
        self.function.call(ctx, args)
    }
}

impl fmt::Debug for BuiltinInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinInstance({})", self.name)
    }
}

/// A source of builtin declarations, in declaration order.
pub trait BuiltinDeclarations {
    fn declarations(&self) -> &[BuiltinEntry];
}
