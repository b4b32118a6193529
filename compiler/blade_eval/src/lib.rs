//! Blade Eval - adaptive tree-walking evaluator for the Blade scripting
//! language.
//!
//! # Architecture
//!
//! - `specialization`: per-call-site cursor and exclusion mask over a
//!   static table of guarded strategies
//! - `operators`: `+`, `*` and `/` as strategy tables; overflow generalizes
//!   the site instead of failing
//! - `slots`: shared per-local kind registers plus per-activation frames
//! - `builtins`: declaration sources, the registry, and the core builtins
//! - `raise`: error construction and traceback rendering for `raise`
//! - `link`: name resolution and per-node runtime state
//! - `interpreter`: the evaluator that ties them together
//!
//! ```text
//! let registry = BuiltinRegistry::shared_core()?;
//! let linked = link(&program, &registry)?;
//! let result = Interpreter::new(&linked).run();
//! ```

pub mod builtins;
pub mod diagnostics;
mod eval_mode;
pub mod interpreter;
pub mod link;
pub mod operators;
mod print_handler;
pub mod raise;
mod shared;
pub mod slots;
pub mod specialization;
mod stack;

use std::sync::Once;

pub use blade_value::{EvalError, EvalErrorKind, EvalResult, Value};
pub use builtins::{
    BuiltinContext, BuiltinDeclarations, BuiltinEntry, BuiltinFunction, BuiltinInstance,
    BuiltinRegistry, CoreBuiltins,
};
pub use diagnostics::{CallFrame, CallStack};
pub use eval_mode::EvalMode;
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use link::{link, CompiledFunction, LinkError, LinkedProgram};
pub use operators::{evaluate_binary, OperatorSite};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use raise::raise;
pub use shared::SharedRegistry;
pub use slots::{Frame, SlotKind, SlotTable};
pub use stack::ensure_sufficient_stack;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=blade_eval=debug` or `RUST_LOG=blade_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
