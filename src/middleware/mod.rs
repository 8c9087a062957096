//! Middleware layer.
//!
//! Cross-cutting concerns applied by the [`Router`](crate::Router) around
//! every handler:
//!
//! - [`context`]: resolves the shopper's [`UserContext`](crate::UserContext)
//!   from proxy-forwarded headers and installs it in the
//!   [`ContextHolder`](crate::ContextHolder) for the request's lifetime.
//! - [`trace`]: per-request span with method, path, status and latency.

pub mod context;
pub mod trace;

pub use context::UserContextLayer;
