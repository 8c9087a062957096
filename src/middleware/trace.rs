//! Per-request tracing span.
//!
//! Every dispatched request runs inside `info_span!("request", method, path)`
//! and logs one completion event carrying the status and latency. Events the
//! handler emits nest under that span.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::response::Response;

pub(crate) async fn instrument<F>(method: &str, path: &str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", method, path);

    async move {
        let started = Instant::now();
        let res = fut.await;
        info!(
            status = u16::from(res.status_code()),
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            "request completed"
        );
        res
    }
    .instrument(span)
    .await
}
