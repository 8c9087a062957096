use std::time::Duration;

use bizshop::{ContextHolder, Request, Response, Router, Server, Status, UserContextLayer, shop};
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn app() -> Router {
    shop::routes(Router::new())
        .get("/shopping/slow-echo", slow_echo)
        .get("/business/peek", peek)
        .with_context(UserContextLayer::new())
}

/// Yields a few times before reporting whose context it sees, so concurrent
/// requests interleave.
async fn slow_echo(_req: Request) -> Response {
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    match ContextHolder::get() {
        Some(ctx) => Response::text(ctx.user_id().as_str().to_owned()),
        None => Response::status(Status::Unauthorized),
    }
}

async fn peek(_req: Request) -> String {
    ContextHolder::is_set().to_string()
}

fn get(path: &str, user: Option<(&str, &str, &str)>) -> http::Request<Bytes> {
    let mut builder = http::Request::get(path);
    if let Some((id, vip, balance)) = user {
        builder = builder
            .header("x-user-id", id)
            .header("x-vip-level", vip)
            .header("x-wallet-balance", balance);
    }
    builder.body(Bytes::new()).unwrap()
}

fn json(res: &Response) -> serde_json::Value {
    serde_json::from_slice(res.body()).unwrap()
}

#[tokio::test]
async fn item_list_returns_fixed_items() {
    let res = app().call(get("/business/shop/item-list", None)).await;

    assert_eq!(res.status_code(), Status::Ok);
    assert_eq!(json(&res), serde_json::json!(["item1", "item2", "item3"]));
}

#[tokio::test]
async fn shopping_request_sees_header_context() {
    let res = app()
        .call(get("/shopping/me", Some(("u-42", "GOLD", "12.50"))))
        .await;

    assert_eq!(res.status_code(), Status::Ok);
    assert_eq!(
        json(&res),
        serde_json::json!({
            "user_id": "u-42",
            "vip_level": "gold",
            "wallet_balance": "12.50",
        }),
    );
}

#[tokio::test]
async fn shopping_request_without_headers_is_unauthorized() {
    let res = app().call(get("/shopping/me", None)).await;

    assert_eq!(res.status_code(), Status::Unauthorized);
    assert_eq!(json(&res), serde_json::json!({ "error": "no user context" }));
}

#[tokio::test]
async fn invalid_headers_yield_no_context() {
    let app = app();

    for user in [
        ("", "gold", "1.00"),
        ("u-1", "diamond", "1.00"),
        ("u-1", "gold", "-5"),
        ("u-1", "gold", "1.001"),
        ("u-1", "gold", "many"),
    ] {
        let res = app.call(get("/shopping/me", Some(user))).await;
        assert_eq!(res.status_code(), Status::Unauthorized, "{user:?}");
    }
}

#[tokio::test]
async fn paths_outside_prefix_never_get_context() {
    let res = app()
        .call(get("/business/peek", Some(("u-42", "gold", "12.50"))))
        .await;

    assert_eq!(res.body(), b"false");
}

#[tokio::test]
async fn router_without_layer_never_sets_context() {
    let app = shop::routes(Router::new());

    let res = app.call(get("/shopping/me", Some(("u-42", "gold", "12.50")))).await;

    assert_eq!(res.status_code(), Status::Unauthorized);
}

#[tokio::test]
async fn context_does_not_outlive_request() {
    let app = app();

    let first = app.call(get("/shopping/me", Some(("u-1", "silver", "1.00")))).await;
    assert_eq!(first.status_code(), Status::Ok);
    assert!(ContextHolder::get().is_none());

    let second = app.call(get("/shopping/me", None)).await;
    assert_eq!(second.status_code(), Status::Unauthorized);
}

#[tokio::test]
async fn custom_prefix_and_headers() {
    let app = shop::routes(Router::new())
        .get("/store/me", shop::current_shopper)
        .with_context(
            UserContextLayer::new()
                .path_prefix("/store/")
                .user_id_header("x-auth-user")
                .vip_level_header("x-auth-tier")
                .wallet_balance_header("x-auth-wallet"),
        );

    let req = http::Request::get("/store/me")
        .header("x-auth-user", "u-9")
        .header("x-auth-tier", "platinum")
        .header("x-auth-wallet", "0")
        .body(Bytes::new())
        .unwrap();
    let res = app.call(req).await;

    assert_eq!(res.status_code(), Status::Ok);
    assert_eq!(json(&res)["user_id"], "u-9");

    // Default prefix is no longer served with context.
    let res = app.call(get("/shopping/me", Some(("u-9", "gold", "1")))).await;
    assert_eq!(res.status_code(), Status::Unauthorized);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_isolated() {
    let app = std::sync::Arc::new(app());
    let mut tasks = tokio::task::JoinSet::new();

    for i in 0..64 {
        let app = std::sync::Arc::clone(&app);
        tasks.spawn(async move {
            let user = format!("u-{i}");
            // Every third request is anonymous.
            let res = if i % 3 == 0 {
                app.call(get("/shopping/slow-echo", None)).await
            } else {
                app.call(get("/shopping/slow-echo", Some((user.as_str(), "regular", "0.00")))).await
            };
            (i, user, res)
        });
    }

    while let Some(res) = tasks.join_next().await {
        let (i, user, res) = res.unwrap();
        if i % 3 == 0 {
            assert_eq!(res.status_code(), Status::Unauthorized);
        } else {
            assert_eq!(res.body(), user.as_bytes());
        }
    }
}

#[tokio::test]
async fn serves_over_tcp_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(
        Server::from_listener(listener).serve_with_shutdown(app(), async move {
            let _ = stop_rx.await;
        }),
    );

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"GET /shopping/me HTTP/1.1\r\n\
              host: localhost\r\n\
              x-user-id: u-tcp\r\n\
              x-vip-level: silver\r\n\
              x-wallet-balance: 7.25\r\n\
              connection: close\r\n\r\n",
        )
        .await
        .unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");
    assert!(raw.contains(r#""user_id":"u-tcp""#), "{raw}");
    assert!(raw.contains(r#""wallet_balance":"7.25""#), "{raw}");

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn truncated_body_is_bad_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(
        Server::from_listener(listener).serve_with_shutdown(app(), async move {
            let _ = stop_rx.await;
        }),
    );

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"GET /business/shop/item-list HTTP/1.1\r\n\
              host: localhost\r\n\
              content-length: 10\r\n\r\n\
              abc",
        )
        .await
        .unwrap();
    stream.shutdown().await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 400 Bad Request"), "{raw}");

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
