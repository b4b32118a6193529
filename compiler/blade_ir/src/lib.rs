//! Blade IR - Intermediate Representation Types
//!
//! This crate contains the syntax-level data structures consumed by the
//! Blade evaluator:
//! - Binary operators and their source symbols
//! - Source locations for call and raise sites
//! - AST nodes (`Expr`, `Stmt`, `FunctionDef`, `Program`)
//! - Builders for assembling programs without a parser
//!
//! The IR is immutable once built. Everything that adapts at runtime
//! (operator specialization state, local slot kinds) lives in the linked
//! representation owned by `blade_eval`, keyed by the dense ids handed out
//! here (`SlotId`, `SiteId`, `CallId`).

pub mod ast;
mod builder;
mod location;
mod operators;

pub use ast::{CallId, Expr, FunctionDef, Program, SiteId, SlotId, Stmt, PROGRAM_FUNCTION_NAME};
pub use builder::{FunctionBuilder, ProgramBuilder};
pub use location::SourceLocation;
pub use operators::BinaryOp;
