//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Every matched handler
//! runs inside the trace span and a fresh [`ContextHolder`](crate::ContextHolder)
//! scope.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{self, UserContextLayer};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    context: Option<UserContextLayer>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), context: None }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    /// Routes are fixed at startup, so this surfaces as a boot failure.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// Install the layer that populates the context holder for matching
    /// requests.
    pub fn with_context(mut self, layer: UserContextLayer) -> Self {
        self.context = Some(layer);
        self
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Routes one fully-buffered request and produces its response.
    ///
    /// Unroutable methods get `405`, unknown paths `404`. Neither runs a
    /// handler, so neither gets a user context. `HEAD` falls back to the
    /// `GET` route when it has none of its own.
    pub async fn call(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        let Some(method) = Method::from_http(&parts.method) else {
            return Response::status(Status::MethodNotAllowed);
        };

        // HEAD without its own route is answered by the GET handler, minus
        // the body.
        let (handler, params, head_via_get) = match self.lookup(method, &path) {
            Some((handler, params)) => (handler, params, false),
            None if method == Method::Head => match self.lookup(Method::Get, &path) {
                Some((handler, params)) => (handler, params, true),
                None => return Response::status(Status::NotFound),
            },
            None => return Response::status(Status::NotFound),
        };

        let req = Request::new(method, parts, body, params);
        let dispatch = middleware::context::run(self.context.as_ref(), handler, req);
        let res = middleware::trace::instrument(method.as_str(), &path, dispatch).await;

        if head_via_get { res.without_body() } else { res }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
