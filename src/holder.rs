//! Request-scoped storage for the current [`UserContext`].
//!
//! # Execution units
//!
//! The holder keeps one slot per *execution unit*: the request that is
//! running right now. There are two kinds:
//!
//! | Where the code runs | Slot | Cleared by |
//! |---|---|---|
//! | inside [`ContextHolder::scope`] | `tokio::task_local!` | the scope ending |
//! | anywhere else | `thread_local!` | [`ContextGuard`] drop or [`ContextHolder::clear`] |
//!
//! The router wraps every handler in [`ContextHolder::scope`], so handlers and
//! everything they call see the task slot. A task slot travels with its
//! future across worker threads and is dropped together with it: on return,
//! on panic, and when the future is cancelled. A previous request's user can
//! never leak into the next one served by the same worker.
//!
//! The thread slot exists for synchronous, thread-per-request callers. Async
//! code must not rely on it: tasks sharing a worker thread share that slot.
//!
//! # Example
//!
//! ```rust
//! use bizshop::{ContextHolder, UserContext};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let ctx = UserContext::parse("u-42", "gold", "12.50").unwrap();
//!
//! ContextHolder::scope(async move {
//!     ContextHolder::set(ctx);
//!     deep_in_the_call_stack();
//! })
//! .await;
//!
//! assert!(ContextHolder::get().is_none());
//! # }
//!
//! fn deep_in_the_call_stack() {
//!     let user = ContextHolder::get().expect("set above");
//!     assert_eq!(user.user_id().as_str(), "u-42");
//! }
//! ```

use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::UserContext;

type Slot = RefCell<Option<Arc<UserContext>>>;

tokio::task_local! {
    static TASK_SLOT: Slot;
}

thread_local! {
    static THREAD_SLOT: Slot = const { RefCell::new(None) };
}

/// Runs `f` against the slot of the current execution unit.
fn with_slot<R>(f: impl FnOnce(&Slot) -> R) -> R {
    // `try_with` consumes its closure even when no scope is active, so check
    // first and only then hand `f` to the slot that actually exists.
    if TASK_SLOT.try_with(|_| ()).is_ok() {
        TASK_SLOT.with(f)
    } else {
        THREAD_SLOT.with(f)
    }
}

/// Process-wide access point to the per-request [`UserContext`].
///
/// Zero-sized: every method is an associated function reaching the
/// `static` slots above, so there is nothing to construct or tear down.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextHolder;

impl ContextHolder {
    /// Associates `context` with the current execution unit, replacing any
    /// previous value.
    pub fn set(context: UserContext) {
        with_slot(|slot| *slot.borrow_mut() = Some(Arc::new(context)));
    }

    /// The context of the current execution unit, if one was set.
    ///
    /// `None` is a normal outcome (requests outside `/shopping/**` never get
    /// one) and callers are expected to branch on it.
    pub fn get() -> Option<Arc<UserContext>> {
        with_slot(|slot| slot.borrow().clone())
    }

    pub fn is_set() -> bool {
        with_slot(|slot| slot.borrow().is_some())
    }

    /// Removes the association for the current execution unit.
    pub fn clear() {
        with_slot(|slot| slot.borrow_mut().take());
    }

    /// Runs `fut` with a fresh, empty task-local slot.
    ///
    /// Whatever is [`set`](Self::set) inside `fut` is dropped when `fut`
    /// finishes, panics, or is cancelled. Nested scopes shadow the outer one
    /// and restore it on exit.
    pub async fn scope<F>(fut: F) -> F::Output
    where
        F: Future,
    {
        TASK_SLOT.scope(RefCell::new(None), fut).await
    }

    /// Sets `context` and returns a guard that clears it when dropped.
    ///
    /// Meant for synchronous, thread-per-request code. The guard is `!Send`:
    /// it clears the unit it was created on, so it cannot be moved elsewhere.
    #[must_use = "the context is cleared as soon as the guard is dropped"]
    pub fn enter(context: UserContext) -> ContextGuard {
        Self::set(context);
        ContextGuard { _unit: PhantomData }
    }
}

/// Clears the current execution unit's context on drop.
///
/// Returned by [`ContextHolder::enter`].
#[derive(Debug)]
pub struct ContextGuard {
    _unit: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        ContextHolder::clear();
    }
}
