//! Telemetry metric name constants.
//!
//! Centralised metric names for munin operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `munin_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method`: HTTP verb (e.g. "GET", "POST")
//! - `status`: outcome: "ok", "api_error" or "transport_error"

/// Total network calls dispatched (cache hits and coalesced joins excluded).
///
/// Labels: `method`, `status`.
pub const REQUESTS_TOTAL: &str = "munin_requests_total";

/// Network call duration in seconds.
///
/// Labels: `method`.
pub const REQUEST_DURATION_SECONDS: &str = "munin_request_duration_seconds";

/// Requests answered from the response cache.
pub const CACHE_HITS_TOTAL: &str = "munin_cache_hits_total";

/// Cacheable requests the response cache could not answer.
pub const CACHE_MISSES_TOTAL: &str = "munin_cache_misses_total";

/// Stale entries removed on lookup.
pub const CACHE_EXPIRED_TOTAL: &str = "munin_cache_expired_total";

/// Requests that joined an identical in-flight call instead of dispatching.
///
/// Labels: `method`.
pub const COALESCED_TOTAL: &str = "munin_coalesced_total";
