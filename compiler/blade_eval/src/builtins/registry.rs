//! Name → builtin declaration map.

use rustc_hash::FxHashMap;

use super::{BuiltinDeclarations, BuiltinEntry, CoreBuiltins};
use crate::link::LinkError;
use crate::shared::SharedRegistry;

/// Registry of builtin declarations. Read-only once built.
#[derive(Debug, Default)]
pub struct BuiltinRegistry {
    entries: FxHashMap<&'static str, BuiltinEntry>,
    order: Vec<&'static str>,
}

impl BuiltinRegistry {
    /// Merge declaration sources in order.
    ///
    /// A name declared twice (within or across sources) is a `LinkError`.
    pub fn from_sources(sources: &[&dyn BuiltinDeclarations]) -> Result<Self, LinkError> {
        let mut registry = BuiltinRegistry::default();
        for source in sources {
            for entry in source.declarations() {
                registry.insert(*entry)?;
            }
        }
        tracing::info!(builtins = registry.len(), "builtin registry built");
        Ok(registry)
    }

    /// Registry with the core builtins only.
    pub fn core() -> Result<Self, LinkError> {
        Self::from_sources(&[&CoreBuiltins])
    }

    /// Core builtins wrapped for sharing between linked programs.
    pub fn shared_core() -> Result<SharedRegistry<Self>, LinkError> {
        Self::core().map(SharedRegistry::new)
    }

    fn insert(&mut self, entry: BuiltinEntry) -> Result<(), LinkError> {
        if self.entries.contains_key(entry.name) {
            return Err(LinkError::DuplicateBuiltin {
                name: entry.name.to_string(),
            });
        }
        self.entries.insert(entry.name, entry);
        self.order.push(entry.name);
        Ok(())
    }

    /// Look up a builtin for link-time resolution.
    pub fn resolve(&self, name: &str) -> Result<&BuiltinEntry, LinkError> {
        self.get(name).ok_or_else(|| LinkError::UnresolvedBuiltin {
            name: name.to_string(),
        })
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&BuiltinEntry> {
        self.entries.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Builtin names in declaration order.
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
