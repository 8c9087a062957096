//! Handler trait and type erasure.
//!
//! Controllers write plain `async fn`s. At registration each one is wrapped
//! in a closure with a single, uniform signature so the router can keep all
//! of them in one tree:
//!
//! ```text
//! async fn item_list(req: Request) -> Json<…>
//!        ↓ router.get("/business/shop/item-list", item_list)
//! Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response>>>>
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future every stored handler returns.
pub(crate) type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A registered handler, shared by every connection task.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn Fn(Request) -> ResponseFuture + Send + Sync>;

/// Anything the router accepts as a route handler:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// Implemented for every such function; there is nothing to implement by
/// hand.
pub trait Handler: Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(move |req: Request| -> ResponseFuture {
            let pending = (self)(req);
            Box::pin(async move { pending.await.into_response() })
        })
    }
}
