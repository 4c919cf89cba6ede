// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out of trigger events to a tenant's listeners.

use std::sync::Arc;

use crate::error::RelayError;
use crate::events::RelayEvent;
use crate::registry::{DeliveryError, ListenerRegistry};
use crate::tenant::TenantDirectory;

/// Result of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event was offered to every listener; `delivered` of them accepted it.
    Accepted { delivered: usize },
    /// The tenant has no open listeners. Nothing was queued.
    NoListeners,
    /// The device is not in the tenant's allow-list. The registry was not read.
    ForbiddenDevice,
}

impl DispatchOutcome {
    /// Map to the API error for non-accepted outcomes.
    pub fn into_result(self) -> Result<usize, RelayError> {
        match self {
            Self::Accepted { delivered } => Ok(delivered),
            Self::NoListeners => Err(RelayError::NoListeners),
            Self::ForbiddenDevice => Err(RelayError::ForbiddenDevice),
        }
    }
}

/// Delivers trigger events using the shared tenant directory and registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tenants: Arc<TenantDirectory>,
    registry: Arc<ListenerRegistry>,
}

impl Dispatcher {
    pub fn new(tenants: Arc<TenantDirectory>, registry: Arc<ListenerRegistry>) -> Self {
        Self { tenants, registry }
    }

    /// Send a wake request for `device` to every listener of `tenant`.
    pub fn dispatch(&self, tenant: &str, device: &str) -> DispatchOutcome {
        if let Some(t) = self.tenants.get(tenant) {
            if !t.permits(device) {
                tracing::warn!(tenant, device, "device not in allow-list");
                return DispatchOutcome::ForbiddenDevice;
            }
        }

        let listeners = self.registry.list_by_tenant(tenant);
        if listeners.is_empty() {
            tracing::info!(tenant, device, "trigger dropped, no listeners connected");
            return DispatchOutcome::NoListeners;
        }

        let event = RelayEvent::SendPacket { device: device.to_owned() };
        let mut delivered = 0;
        for listener in &listeners {
            match listener.sink.deliver(event.clone()) {
                Ok(()) => delivered += 1,
                Err(DeliveryError::Closed) => {
                    tracing::debug!(tenant, listener_id = %listener.id, "listener closed before trigger delivery");
                }
                Err(e) => {
                    tracing::warn!(tenant, listener_id = %listener.id, err = %e, "trigger delivery failed");
                }
            }
        }

        tracing::info!(tenant, device, listeners = listeners.len(), delivered, "trigger dispatched");
        DispatchOutcome::Accepted { delivered }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
