//! Populates the [`ContextHolder`] at request entry and clears it at exit.
//!
//! bizshop sits behind a reverse proxy that has already authenticated the
//! caller. The proxy forwards who the caller is as plain headers:
//!
//! | Header | Example | Field |
//! |---|---|---|
//! | `x-user-id` | `u-42` | [`UserContext::user_id`] |
//! | `x-vip-level` | `gold` | [`UserContext::vip_level`] |
//! | `x-wallet-balance` | `12.50` | [`UserContext::wallet_balance`] |
//!
//! Only paths under the shopping prefix (`/shopping/**` by default) are
//! resolved. Everything else runs with an empty holder, even when the headers
//! are present.

use tracing::{debug, warn};

use crate::context::UserContext;
use crate::handler::BoxedHandler;
use crate::holder::ContextHolder;
use crate::request::Request;
use crate::response::Response;

pub const DEFAULT_PATH_PREFIX: &str = "/shopping";
pub const DEFAULT_USER_ID_HEADER: &str = "x-user-id";
pub const DEFAULT_VIP_LEVEL_HEADER: &str = "x-vip-level";
pub const DEFAULT_WALLET_BALANCE_HEADER: &str = "x-wallet-balance";

/// Resolves a [`UserContext`] from proxy headers for matching paths.
///
/// Install with [`Router::with_context`](crate::Router::with_context).
#[derive(Clone, Debug)]
pub struct UserContextLayer {
    path_prefix: String,
    user_id_header: String,
    vip_level_header: String,
    wallet_balance_header: String,
}

impl UserContextLayer {
    pub fn new() -> Self {
        Self {
            path_prefix: DEFAULT_PATH_PREFIX.to_owned(),
            user_id_header: DEFAULT_USER_ID_HEADER.to_owned(),
            vip_level_header: DEFAULT_VIP_LEVEL_HEADER.to_owned(),
            wallet_balance_header: DEFAULT_WALLET_BALANCE_HEADER.to_owned(),
        }
    }

    /// Paths equal to `prefix` or below `prefix/` get a context. Trailing
    /// slashes are ignored, so `/shopping/` and `/shopping` are the same.
    pub fn path_prefix(mut self, prefix: &str) -> Self {
        let trimmed = prefix.trim_end_matches('/');
        self.path_prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_owned()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    pub fn user_id_header(mut self, name: &str) -> Self {
        self.user_id_header = name.to_owned();
        self
    }

    pub fn vip_level_header(mut self, name: &str) -> Self {
        self.vip_level_header = name.to_owned();
        self
    }

    pub fn wallet_balance_header(mut self, name: &str) -> Self {
        self.wallet_balance_header = name.to_owned();
        self
    }

    /// Whether `path` falls under the configured prefix.
    pub fn matches(&self, path: &str) -> bool {
        // A prefix of "/" trims down to "", which matches every path.
        match path.strip_prefix(self.path_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.path_prefix.is_empty(),
            None => false,
        }
    }

    /// Builds the request's context, or `None` when the path is out of scope
    /// or the identity headers are missing or invalid.
    pub fn resolve(&self, req: &Request) -> Option<UserContext> {
        if !self.matches(req.path()) {
            return None;
        }

        let user_id = req.header(&self.user_id_header);
        let vip_level = req.header(&self.vip_level_header);
        let balance = req.header(&self.wallet_balance_header);

        let (Some(user_id), Some(vip_level), Some(balance)) = (user_id, vip_level, balance) else {
            debug!(path = req.path(), "identity headers missing, no user context");
            return None;
        };

        match UserContext::parse(user_id, vip_level, balance) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                warn!(path = req.path(), error = %e, "rejecting identity headers");
                None
            }
        }
    }
}

impl Default for UserContextLayer {
    fn default() -> Self { Self::new() }
}

/// Runs `handler` inside a fresh holder scope, populated from `layer` when
/// one is installed and resolves a context.
///
/// The scope owns the slot: leaving it on return, panic, or cancellation
/// drops the context, so no request ever starts with a predecessor's user.
pub(crate) async fn run(
    layer: Option<&UserContextLayer>,
    handler: BoxedHandler,
    req: Request,
) -> Response {
    let context = layer.and_then(|layer| layer.resolve(&req));

    ContextHolder::scope(async move {
        if let Some(ctx) = context {
            debug!(user_id = %ctx.user_id(), vip_level = %ctx.vip_level(), "user context set");
            ContextHolder::set(ctx);
        }
        handler(req).await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching() {
        let layer = UserContextLayer::new();

        assert!(layer.matches("/shopping"));
        assert!(layer.matches("/shopping/me"));
        assert!(layer.matches("/shopping/cart/items"));
        assert!(!layer.matches("/shoppingcart"));
        assert!(!layer.matches("/business/shop/item-list"));
    }

    #[test]
    fn prefix_is_normalized() {
        let layer = UserContextLayer::new().path_prefix("store/");

        assert!(layer.matches("/store/checkout"));
        assert!(!layer.matches("/shopping/me"));
    }

    #[test]
    fn root_prefix_matches_everything() {
        let layer = UserContextLayer::new().path_prefix("/");

        assert!(layer.matches("/"));
        assert!(layer.matches("/business/shop/item-list"));
    }
}
