//! Munin error types

use serde_json::Value;

/// Munin error types.
///
/// Errors are `Clone` because a single outcome is handed to every caller
/// that joined the same in-flight request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MuninError {
    // Application errors: the transport succeeded, the service said no
    /// Response arrived with HTTP 200 but the body's `code` was not `1`.
    ///
    /// Carries the full response body so callers can inspect
    /// machine-readable error payloads.
    #[error("API error: {body}")]
    Api { body: Value },

    /// Response arrived with a non-200 HTTP status.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: Value },

    // Transport errors
    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("malformed response: {0}")]
    Decode(String),

    // Caller / setup errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    /// The dispatch task ended without delivering an outcome (it panicked
    /// or the runtime shut down underneath it).
    #[error("request interrupted before completion")]
    Interrupted,
}

impl MuninError {
    /// Whether the service answered but reported a failure.
    pub fn is_application(&self) -> bool {
        matches!(self, MuninError::Api { .. } | MuninError::Status { .. })
    }

    /// Whether the request never produced a usable response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MuninError::Timeout
                | MuninError::Http(_)
                | MuninError::Decode(_)
                | MuninError::Interrupted
        )
    }

    /// The response body attached to an application error, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            MuninError::Api { body } | MuninError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MuninError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MuninError::Timeout
        } else if err.is_decode() {
            MuninError::Decode(err.to_string())
        } else {
            MuninError::Http(err.to_string())
        }
    }
}

/// Result type alias for Munin operations
pub type Result<T> = std::result::Result<T, MuninError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_keeps_full_body() {
        let body = json!({"code": 0, "msg": "token expired", "data": null});
        let err = MuninError::Api { body: body.clone() };
        assert!(err.is_application());
        assert!(!err.is_transport());
        assert_eq!(err.body(), Some(&body));
    }

    #[test]
    fn status_error_is_application() {
        let err = MuninError::Status {
            status: 502,
            body: json!("bad gateway"),
        };
        assert!(err.is_application());
        assert_eq!(err.body(), Some(&json!("bad gateway")));
        assert_eq!(err.to_string(), "HTTP status 502: \"bad gateway\"");
    }

    #[test]
    fn transport_errors_have_no_body() {
        for err in [
            MuninError::Timeout,
            MuninError::Http("connection refused".into()),
            MuninError::Decode("expected value".into()),
            MuninError::Interrupted,
        ] {
            assert!(err.is_transport(), "{err} should be a transport error");
            assert!(!err.is_application());
            assert!(err.body().is_none());
        }
    }
}
