//! Runtime values for the Blade interpreter.
//!
//! # Arc Enforcement
//!
//! Heap-backed values go through factory methods on `Value`. The `Heap<T>`
//! wrapper has a `pub(super)` constructor, so code outside this module
//! cannot build a text or list value without going through them.
//!
//! ```text
//! let s = Value::string("hello");          // OK
//! let list = Value::list(vec![]);          // OK
//! let s = Value::Str(Heap::new(...));      // ERROR: Heap::new is pub(super)
//! ```
//!
//! # Equality
//!
//! Scalars, text and lists compare structurally. Objects compare and hash
//! by identity, never by their fields.

mod heap;
mod object;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use heap::Heap;
pub use object::{ClassRef, ObjectRef};

/// A callable value: a user function or a builtin, referenced by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallableValue {
    pub name: Arc<str>,
    pub builtin: bool,
}

/// Runtime value in the Blade interpreter.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Immutable text.
    Str(Heap<String>),
    /// Immutable list; repetition and concatenation produce new lists.
    List(Heap<Vec<Value>>),
    /// Structured object with a mutable field map.
    Object(ObjectRef),
    Callable(CallableValue),
}

// Factory methods (the only way to build heap-backed variants)
impl Value {
    /// Create a text value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Wrap an object handle.
    #[inline]
    pub fn object(object: ObjectRef) -> Self {
        Value::Object(object)
    }

    /// Create a callable reference.
    pub fn callable(name: &str, builtin: bool) -> Self {
        Value::Callable(CallableValue {
            name: Arc::from(name),
            builtin,
        })
    }
}

impl Value {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Truthiness: nil and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Numeric view: integers widen to float.
    #[expect(
        clippy::cast_precision_loss,
        reason = "numeric widening follows the language's int-to-float rule"
    )]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Callable(_) => "function",
        }
    }

    /// Textual form used by `print` and text concatenation.
    ///
    /// Text is rendered without quotes; floats always keep a fractional part
    /// (`3.0`, not `3`).
    pub fn display_value(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Str(s) => s.to_string(),
            Value::List(items) => {
                let inner: Vec<_> = items.iter().map(Value::display_value).collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Object(obj) => format!("<{} object>", obj.class_name()),
            Value::Callable(c) if c.builtin => format!("<builtin {}>", c.name),
            Value::Callable(c) => format!("<function {}>", c.name),
        }
    }
}

fn format_float(f: f64) -> String {
    format!("{f:?}")
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n:?})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::List(items) => write!(f, "List({:?})", &**items),
            Value::Object(obj) => write!(f, "{obj:?}"),
            Value::Callable(c) => write!(f, "Callable({})", c.name),
        }
    }
}

/// Source-like rendering: text is quoted. Used in diagnostics.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{}\"", &**s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            other => f.write_str(&other.display_value()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::List(items) => {
                items.len().hash(state);
                for item in items.iter() {
                    item.hash(state);
                }
            }
            Value::Object(obj) => obj.hash(state),
            Value::Callable(c) => c.hash(state),
        }
    }
}

#[cfg(test)]
mod tests;
