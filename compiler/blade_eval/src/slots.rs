//! Adaptive storage for local variables.
//!
//! Every declared local has one `SlotDescriptor`, shared by all activations
//! of its function. The descriptor's kind only widens:
//!
//! ```text
//! untyped ──► boolean ─────────────────┐
//!    │                                 ▼
//!    ├──────► integer ──► float ──► generic
//!    └──────► float ───────────────────▲
//! ```
//!
//! Activation frames store cells in the representation of the kind that was
//! current when they were written. Reads always go through the current kind,
//! so a cell written as an integer before another activation widened the
//! slot to float is read back as a float.

use std::sync::atomic::{AtomicU8, Ordering};

use blade_ir::{FunctionDef, SlotId};
use blade_value::Value;

/// Storage kind of a local slot.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKind {
    Untyped = 0,
    Boolean = 1,
    Integer = 2,
    Float = 3,
    Generic = 4,
}

impl SlotKind {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => SlotKind::Untyped,
            1 => SlotKind::Boolean,
            2 => SlotKind::Integer,
            3 => SlotKind::Float,
            _ => SlotKind::Generic,
        }
    }

    /// The narrowest kind that can hold `value`.
    pub fn natural(value: &Value) -> Self {
        match value {
            Value::Bool(_) => SlotKind::Boolean,
            Value::Int(_) => SlotKind::Integer,
            Value::Float(_) => SlotKind::Float,
            _ => SlotKind::Generic,
        }
    }

    /// The kind a slot of kind `self` becomes after storing a value of
    /// kind `incoming`.
    pub fn join(self, incoming: SlotKind) -> Self {
        use SlotKind::{Float, Generic, Integer, Untyped};
        match (self, incoming) {
            (Untyped, kind) => kind,
            (kind, Untyped) => kind,
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Generic,
        }
    }
}

/// Shared per-local kind register.
#[derive(Debug)]
pub struct SlotDescriptor {
    name: String,
    kind: AtomicU8,
}

impl SlotDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        SlotDescriptor {
            name: name.into(),
            kind: AtomicU8::new(SlotKind::Untyped as u8),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> SlotKind {
        SlotKind::from_raw(self.kind.load(Ordering::Acquire))
    }

    /// Widen the kind so it can hold `value`; returns the resulting kind.
    ///
    /// Idempotent, and safe to race: the register only moves up the lattice.
    pub fn generalize(&self, value: &Value) -> SlotKind {
        let incoming = SlotKind::natural(value);
        let mut current = self.kind.load(Ordering::Acquire);
        loop {
            let from = SlotKind::from_raw(current);
            let to = from.join(incoming);
            if to == from {
                return from;
            }
            match self.kind.compare_exchange_weak(
                current,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    tracing::debug!(slot = %self.name, ?from, ?to, "slot generalized");
                    return to;
                }
                Err(observed) => current = observed,
            }
        }
    }
}

/// One frame cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SlotValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Boxed(Value),
}

impl SlotValue {
    /// Encode `value` in the representation for `kind`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "float slots widen integers by definition"
    )]
    fn encode(kind: SlotKind, value: Value) -> Self {
        match (kind, value) {
            (SlotKind::Boolean, Value::Bool(b)) => SlotValue::Bool(b),
            (SlotKind::Integer, Value::Int(n)) => SlotValue::Int(n),
            (SlotKind::Float, Value::Float(f)) => SlotValue::Float(f),
            (SlotKind::Float, Value::Int(n)) => SlotValue::Float(n as f64),
            (_, value) => SlotValue::Boxed(value),
        }
    }

    /// Decode under the current `kind`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer cells read under a float kind are widened"
    )]
    fn decode(&self, kind: SlotKind) -> Value {
        match (self, kind) {
            (SlotValue::Empty, _) => Value::Nil,
            (SlotValue::Int(n), SlotKind::Float) => Value::Float(*n as f64),
            (SlotValue::Bool(b), _) => Value::Bool(*b),
            (SlotValue::Int(n), _) => Value::Int(*n),
            (SlotValue::Float(f), _) => Value::Float(*f),
            (SlotValue::Boxed(v), _) => v.clone(),
        }
    }
}

/// Per-activation storage, indexed by `SlotId`.
#[derive(Clone, Debug)]
pub struct Frame {
    cells: Vec<SlotValue>,
}

impl Frame {
    pub fn new(slot_count: usize) -> Self {
        Frame {
            cells: vec![SlotValue::Empty; slot_count],
        }
    }

    /// Raw cell, for inspecting the stored representation.
    pub fn cell(&self, slot: SlotId) -> Option<&SlotValue> {
        self.cells.get(slot.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The slot descriptors of one linked function.
#[derive(Debug)]
pub struct SlotTable {
    descriptors: Vec<SlotDescriptor>,
}

impl SlotTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SlotTable {
            descriptors: names.into_iter().map(SlotDescriptor::new).collect(),
        }
    }

    /// Descriptors for every declared local of `def`.
    pub fn for_function(def: &FunctionDef) -> Self {
        Self::new(def.locals.iter().map(String::as_str))
    }

    /// A fresh activation frame for this table.
    pub fn new_frame(&self) -> Frame {
        Frame::new(self.descriptors.len())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn descriptor(&self, slot: SlotId) -> Option<&SlotDescriptor> {
        self.descriptors.get(slot.index())
    }

    /// Current kind of `slot`; out-of-range slots read as generic.
    pub fn kind(&self, slot: SlotId) -> SlotKind {
        self.descriptor(slot)
            .map_or(SlotKind::Generic, SlotDescriptor::kind)
    }

    /// Store `value` into `slot`, widening the shared kind first.
    ///
    /// Slot ids are validated at link time; an out-of-range id is ignored.
    pub fn assign(&self, frame: &mut Frame, slot: SlotId, value: Value) {
        let Some(descriptor) = self.descriptor(slot) else {
            return;
        };
        let kind = descriptor.generalize(&value);
        if let Some(cell) = frame.cells.get_mut(slot.index()) {
            *cell = SlotValue::encode(kind, value);
        }
    }

    /// Read `slot` under its current kind. Never-assigned slots read as nil.
    pub fn read(&self, frame: &Frame, slot: SlotId) -> Value {
        frame
            .cells
            .get(slot.index())
            .map_or(Value::Nil, |cell| cell.decode(self.kind(slot)))
    }
}
