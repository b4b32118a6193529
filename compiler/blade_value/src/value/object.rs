//! Structured objects: a class reference plus a mutable field map.
//!
//! Objects are the only mutable values. Identity is the allocation, so two
//! objects with identical fields are still distinct values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Value;

#[derive(Debug)]
struct ClassInfo {
    name: String,
}

/// Reference to a class. Equality is identity.
#[derive(Clone)]
pub struct ClassRef(Arc<ClassInfo>);

impl ClassRef {
    /// Create a new class with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        ClassRef(Arc::new(ClassInfo { name: name.into() }))
    }

    /// The class name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.0.name)
    }
}

struct ObjectValue {
    class: ClassRef,
    fields: RwLock<FxHashMap<String, Value>>,
}

/// Shared handle to a structured object.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectValue>);

impl ObjectRef {
    /// Create an object of `class` with no fields.
    pub fn new(class: ClassRef) -> Self {
        Self::with_fields(class, FxHashMap::default())
    }

    /// Create an object of `class` with initial fields.
    pub fn with_fields(class: ClassRef, fields: FxHashMap<String, Value>) -> Self {
        ObjectRef(Arc::new(ObjectValue {
            class,
            fields: RwLock::new(fields),
        }))
    }

    #[inline]
    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        self.0.class.name()
    }

    /// Read a field, returning `default` when it is absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.0.fields.read().get(key).cloned().unwrap_or(default)
    }

    /// Read a field.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.fields.read().get(key).cloned()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.0.fields.read().contains_key(key)
    }

    /// Insert or overwrite a field.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.0.fields.write().insert(key.into(), value);
    }

    /// Insert a field only if it is absent.
    ///
    /// Returns `false` (and leaves the existing value untouched) when the key
    /// is already defined.
    pub fn define_once(&self, key: &str, value: Value) -> bool {
        let mut fields = self.0.fields.write();
        if fields.contains_key(key) {
            return false;
        }
        fields.insert(key.to_string(), value);
        true
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.fields.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Address-based identity, stable for the object's lifetime and unique
    /// among live objects.
    #[inline]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}, fields: {:?})", self.class_name(), self.field_names())
    }
}

#[cfg(test)]
mod tests;
