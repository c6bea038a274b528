//! Wire-level request and response shapes handed to a [`Transport`](crate::transport::Transport)

use std::time::Duration;

use serde_json::Value;

use super::Method;

/// A fully resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Absolute URL (base URL + path).
    pub url: String,
    pub method: Method,
    pub payload: Value,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl TransportRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as seen by the gateway: HTTP status plus decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// A 200 response wrapping `data` in the service envelope
    /// (`{"code": 1, "data": ...}`).
    pub fn ok(data: Value) -> Self {
        Self::new(200, serde_json::json!({ "code": 1, "data": data }))
    }
}
