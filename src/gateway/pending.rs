//! In-flight request registry.
//!
//! Maps a [`CacheKey`] to the shared receiving end of the one network call
//! currently underway for it. Joining and inserting happen under a single
//! lock acquisition, so at most one call per key is ever live.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::Shared;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::Result;
use crate::cache::CacheKey;

/// Receiving end of a dispatch, cloneable across every joined caller.
pub(crate) type PendingChannel = Shared<oneshot::Receiver<Result<Value>>>;

/// Outcome of [`PendingRegistry::join_or_insert`].
pub(crate) enum Slot {
    /// An identical call is already in flight.
    Joined(PendingChannel),
    /// A fresh channel was registered; the caller must dispatch the call
    /// and deliver its outcome through `sender`.
    Created {
        channel: PendingChannel,
        sender: oneshot::Sender<Result<Value>>,
    },
}

#[derive(Default)]
pub(crate) struct PendingRegistry {
    channels: Mutex<HashMap<CacheKey, PendingChannel>>,
}

impl PendingRegistry {
    /// Return the in-flight channel for `key`, or register a new one.
    ///
    /// Lookup and insertion share one lock acquisition, so two callers can
    /// never both get [`Slot::Created`] for the same key while the first
    /// call is live.
    pub(crate) fn join_or_insert(&self, key: &CacheKey) -> Slot {
        let mut channels = self.channels();
        if let Some(channel) = channels.get(key) {
            return Slot::Joined(channel.clone());
        }
        let (sender, receiver) = oneshot::channel();
        let channel = receiver.shared();
        channels.insert(key.clone(), channel.clone());
        Slot::Created { channel, sender }
    }

    pub(crate) fn remove(&self, key: &CacheKey) {
        self.channels().remove(key);
    }

    pub(crate) fn contains(&self, key: &CacheKey) -> bool {
        self.channels().contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.channels().len()
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<CacheKey, PendingChannel>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs a closure exactly once when dropped.
///
/// Held by the dispatch task so registry cleanup fires on every exit path,
/// including a panic inside the transport.
pub(crate) struct CallOnDrop<F: FnOnce()> {
    f: Option<F>,
}

impl<F: FnOnce()> CallOnDrop<F> {
    pub(crate) fn new(f: F) -> Self {
        Self { f: Some(f) }
    }
}

impl<F: FnOnce()> Drop for CallOnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.f.take() {
            f();
        }
    }
}
