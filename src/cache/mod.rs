//! Caching subsystem.
//!
//! - [`CacheKey`]: deterministic identity of a request, derived from the
//!   method, the path, and a canonical serialization of the payload. The
//!   same key addresses both the response cache and the gateway's
//!   in-flight registry.
//!
//! - [`ResponseCache`]: TTL cache of successful GET response data. Expiry
//!   is lazy: entries are checked on lookup and dropped the moment they are
//!   found stale. There is no size bound and no background sweep, so a
//!   long-running process that issues many distinct GETs grows the map
//!   without limit until [`ResponseCache::clear`] is called.

pub mod key;
pub mod response;

pub use key::CacheKey;
pub use response::{CacheEntry, Lookup, ResponseCache};

use std::time::Duration;

/// Default time-to-live for cached responses: five minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
