//! Stack safety for deep recursion.
//!
//! Uses the `stacker` crate so deeply recursive Blade programs grow the
//! native stack instead of overflowing it.
//!
//! For WASM targets where stacker isn't available, the function just calls
//! the closure directly.

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::ensure_sufficient_stack;

    fn depth(n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            ensure_sufficient_stack(|| depth(n - 1) + 1)
        }
    }

    #[test]
    fn deep_recursion_survives() {
        assert_eq!(depth(100_000), 100_000);
    }
}
