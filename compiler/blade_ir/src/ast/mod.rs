//! AST nodes walked by the evaluator.
//!
//! Every binary operator node carries a `SiteId` and every call node a
//! `CallId`. Ids are dense per function, so the linker can allocate one
//! specialization site (or one builtin instance) per node in a flat table.

use std::fmt;
use std::sync::Arc;

use crate::{BinaryOp, SourceLocation};

/// Internal name of the synthetic top-level function.
pub const PROGRAM_FUNCTION_NAME: &str = ":program";

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            /// The raw index as `usize`, for table lookups.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_index!(
    /// Index of a declared local variable within its function.
    SlotId
);
define_index!(
    /// Index of a binary operator call-site within its function.
    SiteId
);
define_index!(
    /// Index of a call expression within its function.
    CallId
);

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Expr>),
    /// Read of a local slot.
    Local(SlotId),
    /// Binary operator with its own specialization site.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        site: SiteId,
    },
    /// Call of a user function or builtin by name.
    ///
    /// The name is resolved at link time; an unknown name keeps the
    /// program from starting.
    Call {
        callee: String,
        args: Vec<Expr>,
        call: CallId,
        location: SourceLocation,
    },
    /// Reference to a function or builtin as a first-class value.
    FunctionRef(String),
    /// Structured object construction: `ClassName { field: expr, ... }`.
    New {
        class: String,
        fields: Vec<(String, Expr)>,
    },
    /// Field read with nil as the default for a missing field.
    Field { object: Box<Expr>, field: String },
}

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        slot: SlotId,
        value: Expr,
    },
    SetField {
        object: Expr,
        field: String,
        value: Expr,
    },
    Return(Option<Expr>),
    Raise {
        value: Expr,
        location: SourceLocation,
    },
}

/// A function definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Arc<str>,
    /// Name of the source this function was defined in.
    pub source: Arc<str>,
    /// Parameter slots, in call order. Parameters are ordinary locals.
    pub params: Vec<SlotId>,
    /// Declared local names indexed by `SlotId`.
    pub locals: Vec<String>,
    pub body: Vec<Stmt>,
    /// Number of `SiteId`s handed out for this function.
    pub site_count: u32,
    /// Number of `CallId`s handed out for this function.
    pub call_count: u32,
}

impl FunctionDef {
    /// Number of declared locals (parameters included).
    #[inline]
    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Declared name of a local slot.
    pub fn local_name(&self, slot: SlotId) -> Option<&str> {
        self.locals.get(slot.index()).map(String::as_str)
    }

    /// Whether this is the synthetic top-level function.
    pub fn is_program(&self) -> bool {
        &*self.name == PROGRAM_FUNCTION_NAME
    }
}

/// A whole program: named functions plus the top-level body.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub source: Arc<str>,
    pub functions: Vec<FunctionDef>,
    pub main: FunctionDef,
}
