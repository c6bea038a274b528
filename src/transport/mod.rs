//! Transport layer: the network call beneath the gateway.
//!
//! The gateway never talks to the network directly. It resolves a
//! [`TransportRequest`] and hands it to a [`Transport`], which returns the
//! HTTP status and decoded body, or a transport-level error
//! ([`MuninError::Timeout`](crate::MuninError::Timeout),
//! [`MuninError::Http`](crate::MuninError::Http),
//! [`MuninError::Decode`](crate::MuninError::Decode)).
//!
//! Interpreting the body (the `code == 1` envelope) is the gateway's job, so
//! transports stay protocol-agnostic and easy to fake in tests.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;

use crate::Result;
use crate::types::{TransportRequest, TransportResponse};

/// A capability that performs one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging/debugging.
    fn name(&self) -> &str;

    /// Perform the request, honouring `request.timeout`.
    ///
    /// Any HTTP status is a successful transport outcome; only failures to
    /// obtain a decodable response are errors.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        (**self).send(request).await
    }
}
