//! bizshop binary.
//!
//! Run with:
//!   RUST_LOG=bizshop=debug cargo run
//!
//! Try:
//!   curl http://localhost:3000/business/shop/item-list
//!   curl http://localhost:3000/shopping/me \
//!        -H 'x-user-id: u-42' -H 'x-vip-level: gold' -H 'x-wallet-balance: 12.50'
//!   curl http://localhost:3000/healthz

use bizshop::{Config, Error, Router, Server, health, shop};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizshop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = shop::routes(Router::new())
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .with_context(config.context_layer());

    Server::bind(&config.addr())?.serve(app).await
}
