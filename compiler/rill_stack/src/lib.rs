//! Stack safety for deep recursion.
//!
//! ESTree trees nest one level per operator, so a long `a + b + c + ...` chain
//! is as deep as it is long. Loading such a tree, compiling it, and running the
//! compiled closures all recurse once per level. Each of those recursive steps
//! goes through [`ensure_sufficient_stack`], which grows the stack on demand
//! with `stacker`.
//!
//! On WASM targets, where stacker isn't available, the closure is called
//! directly.

/// Minimum stack space to keep available (256KB red zone).
const RED_ZONE: usize = 256 * 1024;

/// Stack space to allocate when growing (2MB).
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
