//! Per-call-site specialization state.
//!
//! A specialization table is a static, ordered list of guarded strategies.
//! Each call-site owns a `SpecializationSite`: a cursor remembering the last
//! strategy that matched and a monotone mask of strategies that are
//! permanently excluded at this site.
//!
//! Dispatch:
//! 1. Try the cursor strategy first if it is not excluded.
//! 2. Otherwise scan the non-excluded strategies in table order; the first
//!    whose guard matches runs and becomes the cursor. Activating a strategy
//!    excludes every strategy in its `replaces` mask.
//! 3. A strategy that answers `Outcome::Rewrite` (checked arithmetic that
//!    overflowed) is excluded and the scan continues.
//!
//! Both registers only ever gain bits or move the cursor, so concurrent
//! updates race benignly: a stale cursor is simply re-derived by the scan.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use blade_value::EvalResult;

/// Maximum number of strategies in one table (one bit each in the mask).
pub const MAX_STRATEGIES: usize = 32;

const NO_CURSOR: u8 = u8::MAX;

/// Result of running a strategy body.
#[derive(Debug)]
pub enum Outcome {
    /// The strategy produced a result (value or error).
    Done(EvalResult),
    /// The strategy cannot handle these operands and must never be tried
    /// again at this site.
    Rewrite,
    /// The operands do not have the shape the guard admitted; continue
    /// scanning without excluding anything.
    Decline,
}

/// One guarded strategy.
pub struct Specialization<Args: ?Sized> {
    /// Short name used in tracing output and introspection.
    pub name: &'static str,
    pub guard: fn(&Args) -> bool,
    pub body: fn(&Args) -> Outcome,
    /// Mask of table indices this strategy supersedes once activated.
    pub replaces: u32,
}

/// Mask bit for a table index.
#[inline]
pub const fn bit(index: usize) -> u32 {
    if index < MAX_STRATEGIES {
        1u32 << index
    } else {
        0
    }
}

/// Cursor + exclusion mask for one call-site.
#[derive(Debug)]
pub struct SpecializationSite {
    cursor: AtomicU8,
    excluded: AtomicU32,
}

impl SpecializationSite {
    pub const fn new() -> Self {
        SpecializationSite {
            cursor: AtomicU8::new(NO_CURSOR),
            excluded: AtomicU32::new(0),
        }
    }

    /// Run the first applicable strategy of `table` on `args`.
    ///
    /// Returns `None` when no strategy applies; the caller raises its own
    /// fallback error.
    pub fn dispatch<Args: ?Sized>(
        &self,
        operation: &str,
        table: &[Specialization<Args>],
        args: &Args,
    ) -> Option<EvalResult> {
        let cursor = self.active();
        if let Some(index) = cursor {
            if let Some(strategy) = table.get(index) {
                if !self.is_excluded(index) && (strategy.guard)(args) {
                    match (strategy.body)(args) {
                        Outcome::Done(result) => return Some(result),
                        Outcome::Rewrite => self.rewrite(operation, index, strategy.name),
                        Outcome::Decline => {}
                    }
                }
            }
        }

        for (index, strategy) in table.iter().enumerate().take(MAX_STRATEGIES) {
            if self.is_excluded(index) || !(strategy.guard)(args) {
                continue;
            }
            match (strategy.body)(args) {
                Outcome::Done(result) => {
                    if cursor != Some(index) {
                        self.activate(operation, index, strategy);
                    }
                    return Some(result);
                }
                Outcome::Rewrite => self.rewrite(operation, index, strategy.name),
                Outcome::Decline => {}
            }
        }
        None
    }

    fn activate<Args: ?Sized>(
        &self,
        operation: &str,
        index: usize,
        strategy: &Specialization<Args>,
    ) {
        if strategy.replaces != 0 {
            self.excluded.fetch_or(strategy.replaces, Ordering::AcqRel);
        }
        // Indices are bounded by MAX_STRATEGIES, which fits in u8.
        let raw = u8::try_from(index).unwrap_or(NO_CURSOR);
        self.cursor.store(raw, Ordering::Release);
        tracing::debug!(
            operation,
            strategy = strategy.name,
            replaces = strategy.replaces,
            "specialization activated"
        );
    }

    fn rewrite(&self, operation: &str, index: usize, name: &'static str) {
        self.excluded.fetch_or(bit(index), Ordering::AcqRel);
        tracing::debug!(operation, strategy = name, "specialization rewritten");
    }

    /// Index of the strategy that matched last, if any.
    pub fn active(&self) -> Option<usize> {
        match self.cursor.load(Ordering::Acquire) {
            NO_CURSOR => None,
            raw => Some(usize::from(raw)),
        }
    }

    #[inline]
    pub fn is_excluded(&self, index: usize) -> bool {
        self.excluded.load(Ordering::Acquire) & bit(index) != 0
    }

    /// The full exclusion mask.
    #[inline]
    pub fn excluded_mask(&self) -> u32 {
        self.excluded.load(Ordering::Acquire)
    }
}

impl Default for SpecializationSite {
    fn default() -> Self {
        Self::new()
    }
}
