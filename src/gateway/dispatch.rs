//! RequestGateway - caching, coalescing front door to a transport

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::pending::{CallOnDrop, PendingRegistry, Slot};
use crate::cache::{CacheKey, Lookup, ResponseCache};
use crate::credentials::CredentialStore;
use crate::telemetry;
use crate::transport::Transport;
use crate::types::{Method, Request, TransportRequest, TransportResponse};
use crate::{MuninError, Result};

/// Eventual outcome of [`RequestGateway::issue`].
///
/// `'static` and independent of the gateway borrow, so it can be stored,
/// moved into a task, or dropped without affecting the underlying call.
pub type ResponseFuture = BoxFuture<'static, Result<Value>>;

/// The request gateway.
///
/// Resolves each request against the response cache, then against the
/// registry of in-flight calls, and only then performs a network call
/// through its [`Transport`]. Cloning is cheap and clones share all state.
///
/// Must be used from within a tokio runtime: network calls are spawned as
/// tasks so that they settle (and clean up) even when every caller has
/// dropped its future.
#[derive(Clone)]
pub struct RequestGateway {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    timeout: Duration,
    token_header: String,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    cache: ResponseCache,
    pending: PendingRegistry,
}

impl RequestGateway {
    pub(crate) fn new(
        base_url: String,
        timeout: Duration,
        cache_ttl: Duration,
        token_header: String,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_url,
                timeout,
                token_header,
                transport,
                credentials,
                cache: ResponseCache::with_ttl(cache_ttl),
                pending: PendingRegistry::default(),
            }),
        }
    }

    /// Issue a request.
    ///
    /// Cache lookup, in-flight lookup and dispatch all happen before this
    /// returns; only the returned future is asynchronous. In order:
    ///
    /// 1. A cacheable GET with a fresh cache entry resolves immediately.
    ///    A stale entry is deleted.
    /// 2. If an identical request (same [`CacheKey`]) is in flight, the
    ///    returned future resolves with that call's outcome.
    /// 3. Otherwise a network call is dispatched and registered as in
    ///    flight until it settles.
    ///
    /// Application failures resolve to [`MuninError::Api`] (carrying the
    /// full response body) or [`MuninError::Status`]; everything else is a
    /// transport error.
    pub fn issue(&self, request: Request) -> ResponseFuture {
        if request.path.is_empty() {
            return ready(Err(MuninError::InvalidInput(
                "request path must not be empty".into(),
            )));
        }

        let key = CacheKey::new(request.method, &request.path, &request.payload);
        let cached = request.is_cached();

        if cached {
            match self.inner.cache.lookup(&key) {
                Lookup::Hit(data) => {
                    debug!(%key, "serving from cache");
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                    return ready(Ok(data));
                }
                Lookup::Expired => {
                    debug!(%key, "cache entry expired");
                    metrics::counter!(telemetry::CACHE_EXPIRED_TOTAL).increment(1);
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                }
                Lookup::Miss => {
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                }
            }
        }

        if tokio::runtime::Handle::try_current().is_err() {
            return ready(Err(MuninError::Configuration(
                "RequestGateway::issue must be called within a tokio runtime".into(),
            )));
        }

        let channel = match self.inner.pending.join_or_insert(&key) {
            Slot::Joined(channel) => {
                debug!(%key, "joining in-flight request");
                metrics::counter!(telemetry::COALESCED_TOTAL, "method" => request.method.as_str())
                    .increment(1);
                channel
            }
            Slot::Created { channel, sender } => {
                Arc::clone(&self.inner).spawn_dispatch(key, request, cached, sender);
                channel
            }
        };

        channel
            .map(|outcome| outcome.unwrap_or(Err(MuninError::Interrupted)))
            .boxed()
    }

    /// GET `path` with an empty payload, cached.
    pub fn get(&self, path: impl Into<String>) -> ResponseFuture {
        self.issue(Request::get(path))
    }

    /// GET `path` with `payload` as query parameters, cached.
    pub fn get_with(&self, path: impl Into<String>, payload: Value) -> ResponseFuture {
        self.issue(Request::get(path).payload(payload))
    }

    pub fn post(&self, path: impl Into<String>, payload: Value) -> ResponseFuture {
        self.issue(Request::post(path).payload(payload))
    }

    pub fn put(&self, path: impl Into<String>, payload: Value) -> ResponseFuture {
        self.issue(Request::put(path).payload(payload))
    }

    pub fn delete(&self, path: impl Into<String>, payload: Value) -> ResponseFuture {
        self.issue(Request::delete(path).payload(payload))
    }

    /// Drop every cached response.
    ///
    /// In-flight requests are untouched: they still settle normally and, if
    /// cacheable, repopulate the cache when they do.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
        info!("cleared response cache");
    }

    /// Base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Number of cached responses, including stale ones not yet looked up.
    pub fn cached_len(&self) -> usize {
        self.inner.cache.len()
    }

    /// Number of network calls currently in flight.
    pub fn pending_len(&self) -> usize {
        self.inner.pending.len()
    }

    /// Whether a network call for `key` is currently in flight.
    pub fn is_pending(&self, key: &CacheKey) -> bool {
        self.inner.pending.contains(key)
    }
}

impl Inner {
    /// Spawn the network call for `request`, delivering its outcome
    /// through `sender`. The registry entry for `key` must already exist.
    fn spawn_dispatch(
        self: Arc<Self>,
        key: CacheKey,
        request: Request,
        cached: bool,
        sender: oneshot::Sender<Result<Value>>,
    ) {
        let registry_owner = Arc::clone(&self);
        let cleanup_key = key.clone();
        let remove_pending = CallOnDrop::new(move || {
            registry_owner.pending.remove(&cleanup_key);
        });

        tokio::spawn(async move {
            let started = Instant::now();
            // A panic settles as `Interrupted` through the same path below.
            let outcome = AssertUnwindSafe(self.dispatch(&request))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    error!(path = %request.path, "transport panicked");
                    Err(MuninError::Interrupted)
                });
            record_outcome(request.method, started, &outcome);

            match &outcome {
                Ok(data) => {
                    if cached {
                        self.cache.insert(key, data.clone());
                    }
                }
                Err(e) => warn!(path = %request.path, error = %e, "request failed"),
            }

            // Evict from the registry before publishing, so a caller either
            // joins a channel that will still receive the outcome or finds
            // the slot free.
            drop(remove_pending);
            let _ = sender.send(outcome);
        });
    }

    async fn dispatch(&self, request: &Request) -> Result<Value> {
        let token = self.credentials.token().unwrap_or_default();
        let wire = TransportRequest {
            url: format!("{}{}", self.base_url, request.path),
            method: request.method,
            payload: request.payload.clone(),
            headers: vec![(self.token_header.clone(), token)],
            timeout: self.timeout,
        };

        debug!(
            transport = self.transport.name(),
            method = %wire.method,
            url = %wire.url,
            "dispatching request"
        );

        let response = self.transport.send(wire).await?;
        interpret(response)
    }
}

/// Unwrap the service envelope: HTTP 200 with `code == 1` carries `data`.
fn interpret(response: TransportResponse) -> Result<Value> {
    let TransportResponse { status, body } = response;
    if status != 200 {
        return Err(MuninError::Status { status, body });
    }
    // Compared numerically, so `1.0` counts.
    if body.get("code").and_then(Value::as_f64) == Some(1.0) {
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    } else {
        Err(MuninError::Api { body })
    }
}

fn record_outcome(method: Method, started: Instant, outcome: &Result<Value>) {
    let status = match outcome {
        Ok(_) => "ok",
        Err(e) if e.is_application() => "api_error",
        Err(_) => "transport_error",
    };
    metrics::counter!(
        telemetry::REQUESTS_TOTAL,
        "method" => method.as_str(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "method" => method.as_str())
        .record(started.elapsed().as_secs_f64());
}

fn ready(outcome: Result<Value>) -> ResponseFuture {
    future::ready(outcome).boxed()
}
