//! Stack safety for deep recursion.
//!
//! Nesting depth in source text is unbounded, so every recursive walk over
//! the syntax (parsing, pretty-printing) runs each level through
//! [`ensure_sufficient_stack`]. On native targets
//! `stacker` grows the stack when the red zone is reached; on WASM the
//! closure is called directly.

/// Grow the stack if fewer than 100KB remain, then run `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const GROWTH: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
