//! Health-check handlers for the orchestrator in front of the shop.
//!
//! | Check | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it take shop traffic? |
//!
//! Neither path is under the shopping prefix, so these checks never carry a user
//! context.

use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"`. The shop has no backing store to wait on,
/// so it is ready as soon as it listens.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Router, Status};

    fn health_routes() -> Router {
        Router::new()
            .get("/healthz", liveness)
            .get("/readyz", readiness)
    }

    async fn hit(path: &str) -> Response {
        health_routes()
            .call(http::Request::get(path).body(Default::default()).unwrap())
            .await
    }

    #[tokio::test]
    async fn liveness_says_ok() {
        let res = hit("/healthz").await;

        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.body(), b"ok");
    }

    #[tokio::test]
    async fn readiness_says_ready() {
        let res = hit("/readyz").await;

        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.body(), b"ready");
    }
}
