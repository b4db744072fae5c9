//! # Dotastat Core
//!
//! Request orchestration for the OpenDota statistics API.
//!
//! ## Overview
//!
//! Every query operation goes through one [`Dispatcher`], which:
//!
//! - **Caches** parsed responses for a fixed TTL, keyed by endpoint and sorted parameters
//! - **Rate limits** outbound calls with a sliding-window timestamp log
//! - **Classifies** upstream failures into a small, stable [`ErrorKind`] taxonomy
//! - **Sweeps** expired cache entries from a background janitor task
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | TTL response cache and cache-key construction |
//! | [`classify`] | Upstream failure to [`ClassifiedError`] mapping |
//! | [`config`] | Environment-driven dispatcher configuration |
//! | [`dispatcher`] | The fetch façade used by every query |
//! | [`error`] | Error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`janitor`] | Background cache sweeper |
//! | [`queries`] | Catalogue of upstream query operations |
//! | [`rate_limiter`] | Sliding-window outbound rate limiter |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dotastat_core::{Dispatcher, DispatcherConfig, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = Dispatcher::new(DispatcherConfig::from_env()?);
//!     let janitor = dispatcher.spawn_janitor();
//!
//!     match dispatcher.query(&Query::PlayerWinLoss(329977411)).await {
//!         Ok(payload) => println!("{payload}"),
//!         Err(error) => eprintln!("{} ({})", error, error.kind()),
//!     }
//!
//!     janitor.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Upstream failures are returned, never raised:
//!
//! ```rust
//! use dotastat_core::{ClassifiedError, ErrorKind};
//!
//! fn describe(error: &ClassifiedError) -> &'static str {
//!     match error.kind() {
//!         ErrorKind::RateLimited => "slow down",
//!         ErrorKind::NotFound => "no such resource",
//!         ErrorKind::UpstreamServerError => "try again later",
//!         ErrorKind::TransportError | ErrorKind::Unknown => "request failed",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! The API key is read from `OPENDOTA_API_KEY` only. It is sent as a query
//! parameter and is part of cache keys, but is never logged.

pub mod cache;
pub mod classify;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http_client;
pub mod janitor;
pub mod queries;
pub mod rate_limiter;

pub use cache::{cache_key, CacheMode, ResponseCache, SweepReport};
pub use classify::{classify, Failure};
pub use config::{DispatcherConfig, RatePolicy};
pub use dispatcher::{Dispatcher, QueryParams};
pub use error::{ClassifiedError, ConfigError, ErrorKind, QueryError};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use janitor::{spawn_janitor, JanitorHandle};
pub use queries::Query;
pub use rate_limiter::RateLimiter;
