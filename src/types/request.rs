//! Logical request descriptor

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Method;

/// A logical request: what to call, with what, and whether the cache may
/// answer it.
///
/// `use_cache` defaults to `true` for GET and `false` for every other verb.
/// Setting it on a non-GET request has no effect; those never touch the
/// cache.
///
/// ```rust
/// # use munin::{Method, Request};
/// # use serde_json::json;
/// let request = Request::get("/project/info").payload(json!({"id": 7}));
/// assert_eq!(request.method, Method::Get);
/// assert!(request.use_cache);
///
/// let login = Request::post("/login").payload(json!({"code": "abc"}));
/// assert!(!login.use_cache);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub path: String,
    pub payload: Value,
    pub method: Method,
    pub use_cache: bool,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            payload: Value::Object(Default::default()),
            method,
            use_cache: method.is_cacheable(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Whether this request may be served from, and stored into, the cache.
    pub fn is_cached(&self) -> bool {
        self.use_cache && self.method.is_cacheable()
    }
}
