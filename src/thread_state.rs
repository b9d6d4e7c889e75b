use crate::errors::*;
use std::cell::Cell;

pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Stack that `std::thread::spawn` gives a thread unless told otherwise.
pub const DEFAULT_THREAD_STACK: usize = 2 * 1024 * 1024;

/// Native stack evaluation may use before it fails with `RecursionLimit`.
/// Half of a default thread stack, the rest is headroom for the caller,
/// the frames of the level that trips the limit, and error formatting.
pub const DEFAULT_STACK_LIMIT: usize = DEFAULT_THREAD_STACK / 2;

/// Generous per-level stack cost of a nested evaluation in an unoptimized build.
pub const STACK_BYTES_PER_LEVEL: usize = 16 * 1024;

thread_local! {
    static STATE: ThreadState = ThreadState::new();
}

/// Per-thread evaluation bookkeeping.
pub struct ThreadState {
    depth: Cell<usize>,
    max_depth: Cell<usize>,
    stack_base: Cell<usize>,
    stack_limit: Cell<usize>,
}

impl ThreadState {
    fn new() -> Self {
        ThreadState {
            depth: Cell::new(0),
            max_depth: Cell::new(DEFAULT_MAX_DEPTH),
            stack_base: Cell::new(0),
            stack_limit: Cell::new(DEFAULT_STACK_LIMIT),
        }
    }

    pub fn depth() -> usize {
        STATE.with(|state| state.depth.get())
    }

    pub fn max_depth() -> usize {
        STATE.with(|state| state.max_depth.get())
    }

    pub fn set_max_depth(n: usize) {
        STATE.with(|state| state.max_depth.set(n))
    }

    pub fn stack_limit() -> usize {
        STATE.with(|state| state.stack_limit.get())
    }

    pub fn set_stack_limit(bytes: usize) {
        STATE.with(|state| state.stack_limit.set(bytes))
    }

    /// Count one more nested evaluation; released when the guard drops.
    ///
    /// Fails when either the nesting depth or the native stack used since
    /// the outermost level exceeds its limit.
    pub fn enter() -> Result<DepthGuard> {
        let here = stack_position();
        STATE.with(|state| {
            let depth = state.depth.get();
            let max_depth = state.max_depth.get();
            if depth >= max_depth {
                return Err(ErrorKind::RecursionLimit(max_depth).into());
            }
            if depth == 0 {
                state.stack_base.set(here);
            } else {
                let base = state.stack_base.get();
                let used = if base > here { base - here } else { here - base };
                if used > state.stack_limit.get() {
                    return Err(ErrorKind::RecursionLimit(depth).into());
                }
            }
            state.depth.set(depth + 1);
            Ok(DepthGuard { _private: () })
        })
    }
}

#[inline(always)]
fn stack_position() -> usize {
    let marker = 0u8;
    std::ptr::addr_of!(marker) as usize
}

pub struct DepthGuard {
    _private: (),
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        STATE.with(|state| state.depth.set(state.depth.get().saturating_sub(1)))
    }
}

/// Limit the nesting depth of evaluation on the current thread.
pub fn set_max_depth(n: usize) {
    ThreadState::set_max_depth(n)
}

pub fn max_depth() -> usize {
    ThreadState::max_depth()
}

/// Limit the native stack evaluation may use on the current thread.
pub fn set_stack_limit(bytes: usize) {
    ThreadState::set_stack_limit(bytes)
}

/// Stack budget for evaluating up to `max_depth` levels. Never below the default.
pub fn stack_limit_for(max_depth: usize) -> usize {
    max_depth
        .saturating_mul(STACK_BYTES_PER_LEVEL)
        .max(DEFAULT_STACK_LIMIT)
}

/// Size of a thread stack that fits `stack_limit` with the same headroom
/// a default thread has over `DEFAULT_STACK_LIMIT`.
pub fn thread_stack_for(stack_limit: usize) -> usize {
    stack_limit.saturating_mul(2)
}
