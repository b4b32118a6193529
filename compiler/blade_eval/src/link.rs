//! Link-time resolution.
//!
//! `link()` turns an immutable `Program` into a `LinkedProgram`: call names
//! are resolved against user functions first and the builtin registry
//! second, every binary operator node gets its own `OperatorSite`, every
//! builtin call gets its own `BuiltinInstance`, and every function gets the
//! `SlotTable` its activations share. An unresolved name keeps the program
//! from starting.

use std::sync::Arc;

use blade_ir::{
    CallId, Expr, FunctionDef, Program, SiteId, SlotId, SourceLocation, Stmt,
    PROGRAM_FUNCTION_NAME,
};
use blade_value::{ClassRef, Value};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::builtins::{BuiltinInstance, BuiltinRegistry};
use crate::operators::OperatorSite;
use crate::shared::SharedRegistry;
use crate::slots::SlotTable;

/// Errors that keep a program from starting.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("builtin `{name}` is declared more than once")]
    DuplicateBuiltin { name: String },
    #[error("`{name}` is not a known function or builtin")]
    UnresolvedBuiltin { name: String },
    #[error("function `{name}` is defined more than once")]
    DuplicateFunction { name: String },
    #[error("invalid {kind} id {id} in `{function}`")]
    InvalidId {
        function: String,
        kind: &'static str,
        id: u32,
    },
}

/// What a call node invokes.
#[derive(Debug)]
pub enum CallTarget {
    /// Index into `LinkedProgram::functions`.
    User(usize),
    /// The builtin instance owned by this call node.
    Builtin(BuiltinInstance),
}

/// Linked expression: IR expression plus the runtime state of its node.
#[derive(Debug)]
pub enum Node {
    Const(Value),
    List(Vec<Node>),
    Local(SlotId),
    Binary {
        left: Box<Node>,
        right: Box<Node>,
        site: OperatorSite,
    },
    Call {
        target: CallTarget,
        args: Vec<Node>,
        location: SourceLocation,
    },
    New {
        class: ClassRef,
        fields: Vec<(String, Node)>,
    },
    Field {
        object: Box<Node>,
        field: String,
    },
}

/// Linked statement.
#[derive(Debug)]
pub enum StmtNode {
    Expr(Node),
    Assign {
        slot: SlotId,
        value: Node,
    },
    SetField {
        object: Node,
        field: String,
        value: Node,
    },
    Return(Option<Node>),
    Raise {
        value: Node,
        location: SourceLocation,
    },
}

/// A function ready to run.
#[derive(Debug)]
pub struct CompiledFunction {
    name: Arc<str>,
    source: Arc<str>,
    params: Vec<SlotId>,
    slots: SlotTable,
    body: Vec<StmtNode>,
}

impl CompiledFunction {
    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    #[inline]
    pub fn params(&self) -> &[SlotId] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Slot descriptors shared by every activation of this function.
    #[inline]
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    #[inline]
    pub fn body(&self) -> &[StmtNode] {
        &self.body
    }

    /// Every operator site in this function, in source order.
    pub fn operator_sites(&self) -> Vec<&OperatorSite> {
        fn visit<'a>(node: &'a Node, out: &mut Vec<&'a OperatorSite>) {
            match node {
                Node::Const(_) | Node::Local(_) => {}
                Node::List(items) => items.iter().for_each(|n| visit(n, out)),
                Node::Binary { left, right, site } => {
                    visit(left, out);
                    visit(right, out);
                    out.push(site);
                }
                Node::Call { args, .. } => args.iter().for_each(|n| visit(n, out)),
                Node::New { fields, .. } => fields.iter().for_each(|(_, n)| visit(n, out)),
                Node::Field { object, .. } => visit(object, out),
            }
        }

        let mut out = Vec::new();
        for stmt in &self.body {
            match stmt {
                StmtNode::Expr(value)
                | StmtNode::Assign { value, .. }
                | StmtNode::Raise { value, .. }
                | StmtNode::Return(Some(value)) => visit(value, &mut out),
                StmtNode::SetField { object, value, .. } => {
                    visit(object, &mut out);
                    visit(value, &mut out);
                }
                StmtNode::Return(None) => {}
            }
        }
        out
    }
}

/// A program whose names are resolved and whose nodes own their runtime
/// state.
#[derive(Debug)]
pub struct LinkedProgram {
    source: Arc<str>,
    functions: Vec<CompiledFunction>,
    main: CompiledFunction,
    by_name: FxHashMap<String, usize>,
    classes: FxHashMap<String, ClassRef>,
    registry: SharedRegistry<BuiltinRegistry>,
}

impl LinkedProgram {
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The top-level body.
    #[inline]
    pub fn main(&self) -> &CompiledFunction {
        &self.main
    }

    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.by_name.get(name).map(|&index| &self.functions[index])
    }

    /// The function behind a `CallTarget::User` index.
    #[inline]
    pub(crate) fn function_at(&self, index: usize) -> &CompiledFunction {
        &self.functions[index]
    }

    /// The class a `New` node of this name instantiates.
    pub fn class(&self, name: &str) -> Option<&ClassRef> {
        self.classes.get(name)
    }

    #[inline]
    pub fn registry(&self) -> &SharedRegistry<BuiltinRegistry> {
        &self.registry
    }
}

/// Resolve `program` against `registry`.
///
/// User functions shadow builtins of the same name.
pub fn link(
    program: &Program,
    registry: &SharedRegistry<BuiltinRegistry>,
) -> Result<LinkedProgram, LinkError> {
    let mut by_name = FxHashMap::default();
    for (index, def) in program.functions.iter().enumerate() {
        if &*def.name == PROGRAM_FUNCTION_NAME || by_name.contains_key(&*def.name) {
            return Err(LinkError::DuplicateFunction {
                name: def.name.to_string(),
            });
        }
        if registry.contains(&def.name) {
            tracing::debug!(name = %def.name, "user function shadows builtin");
        }
        by_name.insert(def.name.to_string(), index);
    }

    let mut linker = Linker {
        by_name: &by_name,
        registry,
        classes: FxHashMap::default(),
    };
    let functions = program
        .functions
        .iter()
        .map(|def| linker.function(def))
        .collect::<Result<Vec<_>, _>>()?;
    let main = linker.function(&program.main)?;
    let classes = linker.classes;

    tracing::info!(
        source = %program.source,
        functions = functions.len(),
        classes = classes.len(),
        "program linked"
    );

    Ok(LinkedProgram {
        source: Arc::clone(&program.source),
        functions,
        main,
        by_name,
        classes,
        registry: registry.clone(),
    })
}

struct Linker<'a> {
    by_name: &'a FxHashMap<String, usize>,
    registry: &'a BuiltinRegistry,
    classes: FxHashMap<String, ClassRef>,
}

/// Per-function id bookkeeping.
struct IdCheck<'d> {
    def: &'d FunctionDef,
    sites: FxHashSet<SiteId>,
    calls: FxHashSet<CallId>,
}

impl IdCheck<'_> {
    fn invalid(&self, kind: &'static str, id: u32) -> LinkError {
        LinkError::InvalidId {
            function: self.def.name.to_string(),
            kind,
            id,
        }
    }

    fn slot(&self, slot: SlotId) -> Result<SlotId, LinkError> {
        if slot.index() < self.def.local_count() {
            Ok(slot)
        } else {
            Err(self.invalid("slot", raw(slot.index())))
        }
    }

    fn site(&mut self, site: SiteId) -> Result<(), LinkError> {
        if raw(site.index()) < self.def.site_count && self.sites.insert(site) {
            Ok(())
        } else {
            Err(self.invalid("site", raw(site.index())))
        }
    }

    fn call(&mut self, call: CallId) -> Result<(), LinkError> {
        if raw(call.index()) < self.def.call_count && self.calls.insert(call) {
            Ok(())
        } else {
            Err(self.invalid("call", raw(call.index())))
        }
    }
}

fn raw(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

impl Linker<'_> {
    fn function(&mut self, def: &FunctionDef) -> Result<CompiledFunction, LinkError> {
        let mut ids = IdCheck {
            def,
            sites: FxHashSet::default(),
            calls: FxHashSet::default(),
        };
        let params = def
            .params
            .iter()
            .map(|&slot| ids.slot(slot))
            .collect::<Result<Vec<_>, _>>()?;
        let body = def
            .body
            .iter()
            .map(|stmt| self.stmt(stmt, &mut ids))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            function = %def.name,
            locals = def.local_count(),
            sites = ids.sites.len(),
            calls = ids.calls.len(),
            "function linked"
        );

        Ok(CompiledFunction {
            name: Arc::clone(&def.name),
            source: Arc::clone(&def.source),
            params,
            slots: SlotTable::for_function(def),
            body,
        })
    }

    fn stmt(&mut self, stmt: &Stmt, ids: &mut IdCheck<'_>) -> Result<StmtNode, LinkError> {
        Ok(match stmt {
            Stmt::Expr(expr) => StmtNode::Expr(self.expr(expr, ids)?),
            Stmt::Assign { slot, value } => StmtNode::Assign {
                slot: ids.slot(*slot)?,
                value: self.expr(value, ids)?,
            },
            Stmt::SetField {
                object,
                field,
                value,
            } => StmtNode::SetField {
                object: self.expr(object, ids)?,
                field: field.clone(),
                value: self.expr(value, ids)?,
            },
            Stmt::Return(value) => StmtNode::Return(
                value
                    .as_ref()
                    .map(|expr| self.expr(expr, ids))
                    .transpose()?,
            ),
            Stmt::Raise { value, location } => StmtNode::Raise {
                value: self.expr(value, ids)?,
                location: *location,
            },
        })
    }

    fn exprs(&mut self, exprs: &[Expr], ids: &mut IdCheck<'_>) -> Result<Vec<Node>, LinkError> {
        exprs.iter().map(|expr| self.expr(expr, ids)).collect()
    }

    fn expr(&mut self, expr: &Expr, ids: &mut IdCheck<'_>) -> Result<Node, LinkError> {
        Ok(match expr {
            Expr::Nil => Node::Const(Value::Nil),
            Expr::Bool(b) => Node::Const(Value::Bool(*b)),
            Expr::Int(n) => Node::Const(Value::Int(*n)),
            Expr::Float(f) => Node::Const(Value::Float(*f)),
            Expr::Str(s) => Node::Const(Value::string(s.as_str())),
            Expr::List(items) => Node::List(self.exprs(items, ids)?),
            Expr::Local(slot) => Node::Local(ids.slot(*slot)?),
            Expr::Binary {
                op,
                left,
                right,
                site,
            } => {
                ids.site(*site)?;
                Node::Binary {
                    left: Box::new(self.expr(left, ids)?),
                    right: Box::new(self.expr(right, ids)?),
                    site: OperatorSite::new(*op),
                }
            }
            Expr::Call {
                callee,
                args,
                call,
                location,
            } => {
                ids.call(*call)?;
                Node::Call {
                    target: self.resolve(callee)?,
                    args: self.exprs(args, ids)?,
                    location: *location,
                }
            }
            Expr::FunctionRef(name) => {
                if self.by_name.contains_key(name) {
                    Node::Const(Value::callable(name, false))
                } else {
                    self.registry.resolve(name)?;
                    Node::Const(Value::callable(name, true))
                }
            }
            Expr::New { class, fields } => Node::New {
                class: self
                    .classes
                    .entry(class.clone())
                    .or_insert_with(|| ClassRef::new(class.as_str()))
                    .clone(),
                fields: fields
                    .iter()
                    .map(|(name, value)| Ok::<_, LinkError>((name.clone(), self.expr(value, ids)?)))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            Expr::Field { object, field } => Node::Field {
                object: Box::new(self.expr(object, ids)?),
                field: field.clone(),
            },
        })
    }

    fn resolve(&self, callee: &str) -> Result<CallTarget, LinkError> {
        if let Some(&index) = self.by_name.get(callee) {
            return Ok(CallTarget::User(index));
        }
        let entry = self.registry.resolve(callee)?;
        Ok(CallTarget::Builtin(entry.instantiate()))
    }
}
