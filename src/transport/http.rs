//! `reqwest`-backed transport.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::Transport;
use crate::types::{Method, TransportRequest, TransportResponse};
use crate::version::version_string;
use crate::{MuninError, Result};

/// Transport over a shared [`reqwest::Client`].
///
/// GET payloads are encoded as the query string; POST, PUT and DELETE send
/// the payload as a JSON body. Response bodies are decoded as JSON. Only a
/// 200 response must decode; any other status with a non-JSON body is
/// passed through as a JSON string (`null` when empty) so the caller still
/// sees what the server said.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// A transport with its own client, identifying as `munin/{version}`.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(version_string())
            .build()
            .map_err(|e| MuninError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Reuse an existing client (connection pool, proxy settings, TLS).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str())
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.method {
            Method::Get => builder.query(&query_pairs(&request.payload)?),
            Method::Post | Method::Put | Method::Delete => builder.json(&request.payload),
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let status = status.as_u16();
        Ok(TransportResponse::new(status, decode_body(status, text)?))
    }
}

/// Decode a response body. Only a 200 must carry JSON.
fn decode_body(status: u16, text: String) -> Result<Value> {
    match serde_json::from_str::<Value>(&text) {
        Ok(body) => Ok(body),
        Err(e) if status == 200 => Err(MuninError::Decode(e.to_string())),
        Err(_) if text.trim().is_empty() => Ok(Value::Null),
        Err(_) => Ok(Value::String(text)),
    }
}

/// Flatten a GET payload into query pairs.
///
/// Only objects (or null) are accepted. Nested values are sent as compact
/// JSON, null fields as empty strings.
fn query_pairs(payload: &Value) -> Result<Vec<(String, String)>> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k.clone(), v)
            })
            .collect()),
        other => Err(MuninError::InvalidInput(format!(
            "GET payload must be an object, got {other}"
        ))),
    }
}
