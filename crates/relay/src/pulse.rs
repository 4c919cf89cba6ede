// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background heartbeat sent to every listener.

use std::sync::Arc;

use crate::events::RelayEvent;
use crate::registry::ListenerRegistry;
use crate::state::RelayState;

/// Spawn the heartbeat task. It runs until the shutdown token fires.
pub fn spawn_pulse(state: Arc<RelayState>) -> tokio::task::JoinHandle<()> {
    let interval = state.config.ping_interval();

    tokio::spawn(async move {
        // First heartbeat one full period after startup.
        let start = tokio::time::Instant::now() + interval;
        let mut timer = tokio::time::interval_at(start, interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                _ = timer.tick() => {}
            }
            pulse_once(&state.registry);
        }
    })
}

/// Write one `PING` to every registered listener. Returns how many accepted it.
pub fn pulse_once(registry: &ListenerRegistry) -> usize {
    let mut delivered = 0;
    for listener in registry.snapshot() {
        match listener.sink.deliver(RelayEvent::Ping) {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::debug!(
                    tenant = %listener.tenant,
                    listener_id = %listener.id,
                    err = %e,
                    "heartbeat not delivered"
                );
            }
        }
    }
    delivered
}
