//! # bizshop
//!
//! A small shop service behind a reverse proxy, built around one idea: the
//! *request-scoped context holder*.
//!
//! ## The contract
//!
//! The proxy authenticates the caller and forwards who they are as headers
//! (`x-user-id`, `x-vip-level`, `x-wallet-balance`). bizshop does not check
//! credentials. For requests under `/shopping`, it turns those headers into an
//! immutable [`UserContext`] and parks it in the [`ContextHolder`] for exactly
//! the lifetime of that request. Any code on the request path can then ask
//! "who is shopping?" without the user being threaded through every call:
//!
//! ```rust
//! use bizshop::ContextHolder;
//!
//! fn discount_banner() -> Option<String> {
//!     let shopper = ContextHolder::get()?;
//!     Some(format!("welcome back, {} member", shopper.vip_level()))
//! }
//! ```
//!
//! When the request ends (normally, by panic, or because the client went
//! away) the context goes with it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use bizshop::{Router, Server, UserContextLayer, health, shop};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bizshop::Error> {
//!     let app = shop::routes(Router::new())
//!         .get("/healthz", health::liveness)
//!         .with_context(UserContextLayer::new());
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//! ```

mod context;
mod error;
mod handler;
mod holder;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod health;
pub mod middleware;
pub mod shop;

pub use config::Config;
pub use context::{Balance, UserContext, UserId, VipLevel};
pub use error::{ContextError, Error};
pub use handler::Handler;
pub use holder::{ContextGuard, ContextHolder};
pub use method::Method;
pub use middleware::UserContextLayer;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
