//! Shop controller.
//!
//! | Route | Context | Response |
//! |---|---|---|
//! | `GET /business/shop/item-list` | never | fixed item names |
//! | `GET /shopping/me` | required | the caller's [`UserContext`] or `401` |
//!
//! Handlers under `/shopping` never receive the user as a parameter. They,
//! and anything they call, read it from the [`ContextHolder`].

use crate::context::UserContext;
use crate::holder::ContextHolder;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;

pub const ITEM_LIST_PATH: &str = "/business/shop/item-list";
pub const CURRENT_SHOPPER_PATH: &str = "/shopping/me";

pub const ITEMS: [&str; 3] = ["item1", "item2", "item3"];

/// Registers the shop routes on `router`.
pub fn routes(router: Router) -> Router {
    router
        .get(ITEM_LIST_PATH, item_list)
        .get(CURRENT_SHOPPER_PATH, current_shopper)
}

pub async fn item_list(_req: Request) -> Json<[&'static str; 3]> {
    Json(ITEMS)
}

pub async fn current_shopper(_req: Request) -> Response {
    match shopper() {
        Some(ctx) => Json(ctx).into_response(),
        None => Response::builder()
            .status(Status::Unauthorized)
            .json(br#"{"error":"no user context"}"#.to_vec()),
    }
}

/// Reads the current shopper straight from the holder; nothing is passed in.
fn shopper() -> Option<UserContext> {
    ContextHolder::get().map(|ctx| UserContext::clone(&ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn item_list_is_fixed() {
        let res = routes(Router::new())
            .call(http::Request::get(ITEM_LIST_PATH).body(Default::default()).unwrap())
            .await;

        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.body(), br#"["item1","item2","item3"]"#);
    }

    #[tokio::test]
    async fn shopper_comes_from_holder() {
        let ctx = UserContext::parse("u-7", "silver", "3.10").unwrap();

        let seen = ContextHolder::scope(async move {
            ContextHolder::set(ctx);
            shopper()
        })
        .await;

        assert_eq!(seen.unwrap().user_id().as_str(), "u-7");
        assert!(shopper().is_none());
    }

    #[tokio::test]
    async fn current_shopper_without_context_is_401() {
        let res = routes(Router::new())
            .call(http::Request::get(CURRENT_SHOPPER_PATH).body(Default::default()).unwrap())
            .await;

        assert_eq!(res.status_code(), Status::Unauthorized);
        assert_eq!(res.body(), br#"{"error":"no user context"}"#);
    }
}
