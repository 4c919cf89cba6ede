// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the wake-on-LAN relay.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "wol-relay", version, about)]
pub struct RelayConfig {
    /// Host to bind on.
    #[arg(long, default_value = "0.0.0.0", env = "WOL_RELAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8093, env = "HTTP_PORT")]
    pub port: u16,

    /// Path to the tenant directory JSON file.
    #[arg(long, env = "WOL_RELAY_TENANTS")]
    pub tenants: PathBuf,

    /// Heartbeat interval in milliseconds.
    #[arg(long, default_value_t = 1000, env = "WOL_RELAY_PING_INTERVAL_MS")]
    pub ping_interval_ms: u64,

    /// Events buffered per listener before new ones are dropped.
    #[arg(long, default_value_t = 32, env = "WOL_RELAY_LISTENER_BUFFER")]
    pub listener_buffer: usize,
}

impl RelayConfig {
    pub fn ping_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.ping_interval_ms.max(1))
    }

    pub fn listener_buffer(&self) -> usize {
        self.listener_buffer.max(1)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
