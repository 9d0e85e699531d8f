//! Stack growth for the recursive parser and evaluator.
//!
//! Deeply nested source or deep interpreted recursion recurses natively.
//! Wrapping the recursive entry points in [`ensure_sufficient_stack`] lets the
//! configured depth bounds, not the thread's stack size, decide when to stop.

/// If less than this remains, grow the stack.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than `RED_ZONE` bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
