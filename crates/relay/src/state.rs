// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::dispatch::Dispatcher;
use crate::registry::ListenerRegistry;
use crate::tenant::TenantDirectory;

/// Shared relay state.
pub struct RelayState {
    pub config: RelayConfig,
    pub tenants: Arc<TenantDirectory>,
    pub registry: Arc<ListenerRegistry>,
    pub dispatcher: Dispatcher,
    pub shutdown: CancellationToken,
}

impl RelayState {
    pub fn new(config: RelayConfig, tenants: TenantDirectory, shutdown: CancellationToken) -> Self {
        let tenants = Arc::new(tenants);
        let registry = Arc::new(ListenerRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&tenants), Arc::clone(&registry));
        Self { config, tenants, registry, dispatcher, shutdown }
    }
}
