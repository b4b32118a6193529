//! Evaluation modes for the Blade interpreter.
//!
//! `EvalMode` parameterizes the evaluator's policies: the call-depth limit
//! and where `print` output goes by default.

use crate::print_handler::{buffer_handler, stdout_handler, SharedPrintHandler};

/// Evaluation mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Standard script execution: output to stdout, recursion bounded only
    /// by `stacker` growing the native stack.
    #[default]
    Interpret,
    /// Test execution: output is captured and recursion is bounded.
    TestRun,
    /// Script execution with an explicit call-depth limit.
    Bounded {
        /// Maximum number of live call frames.
        max_depth: usize,
    },
}

impl EvalMode {
    /// Whether `print` writes to the process's stdout by default.
    #[inline]
    pub fn allows_io(&self) -> bool {
        !matches!(self, Self::TestRun)
    }

    /// Maximum call depth, or `None` for unlimited.
    ///
    /// - `Interpret`: `None` on native (stacker grows the stack), 200 on WASM
    /// - `TestRun`: always 500
    /// - `Bounded`: the configured limit
    #[inline]
    pub fn max_recursion_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => {
                #[cfg(target_arch = "wasm32")]
                {
                    Some(200)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    None
                }
            }
            Self::TestRun => Some(500),
            Self::Bounded { max_depth } => Some(*max_depth),
        }
    }

    /// Print handler used when the builder does not set one.
    pub fn default_print_handler(&self) -> SharedPrintHandler {
        if self.allows_io() {
            stdout_handler()
        } else {
            buffer_handler()
        }
    }
}
