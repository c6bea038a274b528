//! Munin - caching, coalescing HTTP request gateway
//!
//! This crate sits between application code and the network. Every request
//! goes through a [`RequestGateway`], which adds two behaviours on top of a
//! raw HTTP call:
//!
//! - **Response caching**: successful GET responses are kept for five
//!   minutes and served without touching the network.
//! - **Request coalescing**: identical requests issued while one is already
//!   in flight share that call's outcome instead of starting another.
//!
//! Responses use the service envelope `{"code": 1, "data": ...}`; the
//! gateway resolves to `data` on success and to a [`MuninError`] otherwise.
//!
//! # Example
//!
//! ```rust,no_run
//! use munin::{Munin, Request};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> munin::Result<()> {
//!     let gateway = Munin::builder()
//!         .base_url("https://api.example.com/api")
//!         .token("session-token")
//!         .build()?;
//!
//!     // Network call; the result is cached.
//!     let project = gateway.issue(Request::get("/project/info").payload(json!({"id": 7}))).await?;
//!     // Served from cache.
//!     let again = gateway.get_with("/project/info", json!({"id": 7})).await?;
//!     assert_eq!(project, again);
//!
//!     gateway.clear_cache();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
#[cfg(feature = "cli")]
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod telemetry;
pub mod transport;
pub mod types;
mod version;

// Re-export main types at crate root
pub use api::{Api, Endpoint};
pub use cache::{CacheKey, ResponseCache};
pub use credentials::{CredentialStore, MemoryCredentialStore, NoCredentials, StaticToken};
pub use error::{MuninError, Result};
pub use gateway::{Munin, MuninBuilder, RequestGateway, ResponseFuture};
pub use transport::{HttpTransport, Transport};
pub use types::{Method, Request, TransportRequest, TransportResponse};
pub use version::{PKG_VERSION, version_string};
