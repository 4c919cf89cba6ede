// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory registry of open listener connections.
//!
//! Every operation takes the same mutex, so dispatch, the heartbeat task and
//! connection teardown always observe a consistent set of listeners. Lock
//! scopes never cross an `.await`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::events::RelayEvent;

/// Process-unique listener identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an event did not reach a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The stream behind this sink has gone away.
    Closed,
    /// The listener is not draining its queue.
    Full,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("listener closed"),
            Self::Full => f.write_str("listener queue full"),
        }
    }
}

/// Write half of a listener's outbound event queue.
#[derive(Debug, Clone)]
pub struct ListenerSink {
    tx: mpsc::Sender<RelayEvent>,
}

impl ListenerSink {
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<RelayEvent>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }

    /// Queue an event without waiting.
    pub fn deliver(&self, event: RelayEvent) -> Result<(), DeliveryError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A registered listener connection.
#[derive(Debug, Clone)]
pub struct Listener {
    pub id: ListenerId,
    pub tenant: String,
    pub connected_at: Instant,
    pub sink: ListenerSink,
}

/// The set of open listener connections across all tenants.
#[derive(Debug)]
pub struct ListenerRegistry {
    listeners: Mutex<IndexMap<ListenerId, Listener>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self { listeners: Mutex::new(IndexMap::new()), next_id: AtomicU64::new(1) }
    }

    /// Allocate a fresh listener id.
    pub fn next_id(&self) -> ListenerId {
        ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Insert a listener. Returns `false` (keeping the existing entry) if the
    /// id is already registered, which indicates a bug in id allocation.
    pub fn add(&self, listener: Listener) -> bool {
        let mut listeners = self.listeners.lock();
        debug_assert!(!listeners.contains_key(&listener.id), "duplicate listener id {}", listener.id);
        if listeners.contains_key(&listener.id) {
            tracing::error!(listener_id = %listener.id, "duplicate listener id, keeping existing entry");
            return false;
        }
        listeners.insert(listener.id, listener);
        true
    }

    /// Remove a listener. Removing an absent id is a no-op.
    pub fn remove(&self, id: ListenerId) -> Option<Listener> {
        self.listeners.lock().shift_remove(&id)
    }

    /// Listeners belonging to `tenant`, in admission order.
    pub fn list_by_tenant(&self, tenant: &str) -> Vec<Listener> {
        self.listeners.lock().values().filter(|l| l.tenant == tenant).cloned().collect()
    }

    /// Every registered listener, in admission order.
    pub fn snapshot(&self) -> Vec<Listener> {
        self.listeners.lock().values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.lock().contains_key(&id)
    }

    /// Admit a new listener for `tenant`.
    ///
    /// The `CONNECTED` acknowledgement is queued before the listener becomes
    /// visible to dispatch, so it is always the first event on the stream.
    /// Dropping the returned guard removes the listener.
    pub fn admit(self: &Arc<Self>, tenant: &str, buffer: usize) -> Subscription {
        let (sink, events) = ListenerSink::channel(buffer);
        let _ = sink.deliver(RelayEvent::Connected);

        let listener = Listener {
            id: self.next_id(),
            tenant: tenant.to_owned(),
            connected_at: Instant::now(),
            sink,
        };
        let guard = ListenerGuard {
            id: listener.id,
            tenant: listener.tenant.clone(),
            connected_at: listener.connected_at,
            registry: Arc::clone(self),
        };
        self.add(listener);
        tracing::info!(tenant = %guard.tenant, listener_id = %guard.id, "new listener connection");

        Subscription { events, guard }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of an admitted listener plus its registration guard.
#[derive(Debug)]
pub struct Subscription {
    pub events: mpsc::Receiver<RelayEvent>,
    pub guard: ListenerGuard,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.guard.id
    }
}

/// Removes its listener from the registry when dropped.
#[derive(Debug)]
pub struct ListenerGuard {
    id: ListenerId,
    tenant: String,
    connected_at: Instant,
    registry: Arc<ListenerRegistry>,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if self.registry.remove(self.id).is_some() {
            tracing::info!(
                tenant = %self.tenant,
                listener_id = %self.id,
                connected_for = ?self.connected_at.elapsed(),
                "listener connection closed"
            );
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
