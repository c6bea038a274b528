//! Cache key derivation.

use std::fmt::{self, Write};

use serde_json::Value;

use crate::types::Method;

/// Identity of a request: `METHOD:path:canonical-payload`.
///
/// The payload is serialized canonically (object keys sorted at every
/// depth), so two structurally-equal payloads always produce the same key
/// regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(method: Method, path: &str, payload: &Value) -> Self {
        let mut key = String::with_capacity(path.len() + 16);
        key.push_str(method.as_str());
        key.push(':');
        key.push_str(path);
        key.push(':');
        write_canonical(&mut key, payload);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write `value` as compact JSON with object keys in sorted order.
///
/// `serde_json::Map` is only sorted when the `preserve_order` feature is
/// off, and that feature can be switched on by any crate in the build, so
/// ordering is enforced here rather than inherited.
fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(out, &Value::String(k.clone()));
                out.push(':');
                write_canonical(out, v);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, v);
            }
            out.push(']');
        }
        scalar => write_scalar(out, scalar),
    }
}

fn write_scalar(out: &mut String, value: &Value) {
    // Display for Value is compact JSON with proper string escaping.
    let _ = write!(out, "{value}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_layout() {
        let key = CacheKey::new(Method::Get, "/project/info", &json!({"id": 3}));
        assert_eq!(key.as_str(), "GET:/project/info:{\"id\":3}");
    }

    #[test]
    fn empty_payload() {
        let key = CacheKey::new(Method::Get, "/like/list", &json!({}));
        assert_eq!(key.to_string(), "GET:/like/list:{}");
    }

    #[test]
    fn structurally_equal_payloads_collide() {
        let mut a = serde_json::Map::new();
        a.insert("b".into(), json!(2));
        a.insert("a".into(), json!({"y": [1, 2], "x": null}));
        let mut b = serde_json::Map::new();
        b.insert("a".into(), json!({"x": null, "y": [1, 2]}));
        b.insert("b".into(), json!(2));

        assert_eq!(
            CacheKey::new(Method::Get, "/p", &Value::Object(a)),
            CacheKey::new(Method::Get, "/p", &Value::Object(b)),
        );
    }

    #[test]
    fn differs_on_payload() {
        assert_ne!(
            CacheKey::new(Method::Get, "/a", &json!({"x": 1})),
            CacheKey::new(Method::Get, "/a", &json!({"x": 2})),
        );
    }

    #[test]
    fn differs_on_method() {
        assert_ne!(
            CacheKey::new(Method::Get, "/a", &json!({})),
            CacheKey::new(Method::Post, "/a", &json!({})),
        );
    }

    #[test]
    fn differs_on_path() {
        assert_ne!(
            CacheKey::new(Method::Get, "/a", &json!({})),
            CacheKey::new(Method::Get, "/b", &json!({})),
        );
    }

    #[test]
    fn array_order_matters() {
        assert_ne!(
            CacheKey::new(Method::Get, "/a", &json!([1, 2])),
            CacheKey::new(Method::Get, "/a", &json!([2, 1])),
        );
    }

    #[test]
    fn string_and_number_do_not_collide() {
        assert_ne!(
            CacheKey::new(Method::Get, "/a", &json!({"id": 1})),
            CacheKey::new(Method::Get, "/a", &json!({"id": "1"})),
        );
    }

    #[test]
    fn keys_with_quotes_are_escaped() {
        let key = CacheKey::new(Method::Get, "/a", &json!({"q\"k": "v"}));
        assert_eq!(key.as_str(), "GET:/a:{\"q\\\"k\":\"v\"}");
    }
}
