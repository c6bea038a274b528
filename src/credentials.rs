//! Credential lookup for outgoing requests.
//!
//! The gateway reads the token on every dispatch, never caching it, so a
//! token set or rotated between two calls applies to the very next one.

use std::sync::{Arc, PoisonError, RwLock};

/// Synchronous source of the credential token.
pub trait CredentialStore: Send + Sync {
    /// The currently stored token, if any.
    fn token(&self) -> Option<String>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// Settable in-memory token store.
///
/// Typically shared (`Arc<MemoryCredentialStore>`) between the gateway and
/// whatever performs login, which calls [`set_token`](Self::set_token).
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .map(|t| t.is_some())
            .unwrap_or_else(|e| e.into_inner().is_some())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A fixed token, e.g. from an environment variable.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl CredentialStore for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No credential at all; requests carry an empty token header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialStore for NoCredentials {
    fn token(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(!store.has_token());
        assert_eq!(store.token(), None);

        store.set_token("abc");
        assert!(store.has_token());
        assert_eq!(store.token().as_deref(), Some("abc"));

        store.set_token("def");
        assert_eq!(store.token().as_deref(), Some("def"));

        store.clear_token();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn static_and_empty() {
        assert_eq!(StaticToken("t".into()).token().as_deref(), Some("t"));
        assert_eq!(NoCredentials.token(), None);
    }
}
