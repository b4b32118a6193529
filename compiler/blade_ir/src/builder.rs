//! Builders for assembling programs in code.
//!
//! There is no parser in this workspace; embedders and tests build the
//! AST directly. The builders hand out dense `SlotId`/`SiteId`/`CallId`
//! values so every node that needs runtime state gets its own entry.
//!
//! ```text
//! let program = ProgramBuilder::new("demo.b");
//! let mut main = program.main();
//! let x = main.local("x");
//! let sum = main.add(Expr::Int(1), Expr::Int(2));
//! main.assign(x, sum);
//! let print = main.call("print", vec![Expr::Local(x)], SourceLocation::new(2, 1));
//! main.expr(print);
//! let program = program.finish(main);
//! ```

use std::sync::Arc;

use crate::{
    BinaryOp, CallId, Expr, FunctionDef, Program, SiteId, SlotId, SourceLocation, Stmt,
    PROGRAM_FUNCTION_NAME,
};

/// Builder for a single function body.
pub struct FunctionBuilder {
    name: Arc<str>,
    source: Arc<str>,
    params: Vec<SlotId>,
    locals: Vec<String>,
    body: Vec<Stmt>,
    next_site: u32,
    next_call: u32,
}

impl FunctionBuilder {
    fn new(name: Arc<str>, source: Arc<str>) -> Self {
        FunctionBuilder {
            name,
            source,
            params: Vec::new(),
            locals: Vec::new(),
            body: Vec::new(),
            next_site: 0,
            next_call: 0,
        }
    }

    fn next_slot(&mut self, name: &str) -> SlotId {
        let raw = u32::try_from(self.locals.len()).unwrap_or(u32::MAX);
        self.locals.push(name.to_string());
        SlotId::new(raw)
    }

    /// Declare a parameter. Parameters are bound in declaration order.
    pub fn param(&mut self, name: &str) -> SlotId {
        let slot = self.next_slot(name);
        self.params.push(slot);
        slot
    }

    /// Declare a local variable.
    pub fn local(&mut self, name: &str) -> SlotId {
        self.next_slot(name)
    }

    /// Build a binary operator node with a fresh call-site.
    pub fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let site = SiteId::new(self.next_site);
        self.next_site = self.next_site.saturating_add(1);
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            site,
        }
    }

    pub fn add(&mut self, left: Expr, right: Expr) -> Expr {
        self.binary(BinaryOp::Add, left, right)
    }

    pub fn mul(&mut self, left: Expr, right: Expr) -> Expr {
        self.binary(BinaryOp::Mul, left, right)
    }

    pub fn div(&mut self, left: Expr, right: Expr) -> Expr {
        self.binary(BinaryOp::Div, left, right)
    }

    /// Build a call node with a fresh call id.
    pub fn call(&mut self, callee: &str, args: Vec<Expr>, location: SourceLocation) -> Expr {
        let call = CallId::new(self.next_call);
        self.next_call = self.next_call.saturating_add(1);
        Expr::Call {
            callee: callee.to_string(),
            args,
            call,
            location,
        }
    }

    /// Append an expression statement.
    pub fn expr(&mut self, expr: Expr) {
        self.body.push(Stmt::Expr(expr));
    }

    pub fn assign(&mut self, slot: SlotId, value: Expr) {
        self.body.push(Stmt::Assign { slot, value });
    }

    pub fn set_field(&mut self, object: Expr, field: &str, value: Expr) {
        self.body.push(Stmt::SetField {
            object,
            field: field.to_string(),
            value,
        });
    }

    pub fn ret(&mut self, value: Option<Expr>) {
        self.body.push(Stmt::Return(value));
    }

    pub fn raise(&mut self, value: Expr, location: SourceLocation) {
        self.body.push(Stmt::Raise { value, location });
    }

    /// Finish the function.
    pub fn finish(self) -> FunctionDef {
        FunctionDef {
            name: self.name,
            source: self.source,
            params: self.params,
            locals: self.locals,
            body: self.body,
            site_count: self.next_site,
            call_count: self.next_call,
        }
    }
}

/// Builder for a whole program.
pub struct ProgramBuilder {
    source: Arc<str>,
    functions: Vec<FunctionDef>,
}

impl ProgramBuilder {
    /// Create a builder for a program read from `source`.
    pub fn new(source: &str) -> Self {
        ProgramBuilder {
            source: Arc::from(source),
            functions: Vec::new(),
        }
    }

    /// Start a named function in this program's source.
    pub fn function(&self, name: &str) -> FunctionBuilder {
        FunctionBuilder::new(Arc::from(name), Arc::clone(&self.source))
    }

    /// Start the top-level body.
    pub fn main(&self) -> FunctionBuilder {
        FunctionBuilder::new(Arc::from(PROGRAM_FUNCTION_NAME), Arc::clone(&self.source))
    }

    /// Add a finished function.
    pub fn add(&mut self, function: FunctionDef) -> &mut Self {
        self.functions.push(function);
        self
    }

    /// Finish the program with its top-level body.
    pub fn finish(self, main: FunctionBuilder) -> Program {
        Program {
            source: self.source,
            functions: self.functions,
            main: main.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sites_and_calls_are_dense() {
        let program = ProgramBuilder::new("ids.b");
        let mut main = program.main();
        let a = main.add(Expr::Int(1), Expr::Int(2));
        let b = main.mul(a, Expr::Int(3));
        let c = main.call("print", vec![b], SourceLocation::new(1, 1));
        let d = main.call("time", vec![], SourceLocation::new(2, 1));
        main.expr(c);
        main.expr(d);
        let def = main.finish();
        assert_eq!(def.site_count, 2);
        assert_eq!(def.call_count, 2);
        assert_eq!(def.body.len(), 2);
    }

    #[test]
    fn binary_shape() {
        let program = ProgramBuilder::new("shape.b");
        let mut f = program.function("f");
        let expr = f.div(Expr::Int(6), Expr::Int(2));
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Div,
                left: Box::new(Expr::Int(6)),
                right: Box::new(Expr::Int(2)),
                site: SiteId::new(0),
            }
        );
    }

    #[test]
    fn functions_share_source() {
        let mut program = ProgramBuilder::new("shared.b");
        let f = program.function("helper").finish();
        program.add(f);
        let main = program.main();
        let program = program.finish(main);
        assert_eq!(program.functions.len(), 1);
        assert_eq!(&*program.functions[0].source, "shared.b");
        assert_eq!(&*program.source, "shared.b");
    }
}
