// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wake-on-LAN relay: fans trigger requests out to listening agents over
//! Server-Sent Events.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod pulse;
pub mod registry;
pub mod state;
pub mod tenant;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::pulse::spawn_pulse;
use crate::state::RelayState;
use crate::tenant::TenantDirectory;
use crate::transport::build_router;

/// Run the relay server until shutdown.
pub async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let tenants = TenantDirectory::load(&config.tenants)?;
    if tenants.is_empty() {
        tracing::warn!("tenant directory is empty, every protected request will be rejected");
    }

    let addr = config.bind_addr();
    let tenant_count = tenants.len();
    let shutdown = CancellationToken::new();
    let state = Arc::new(RelayState::new(config, tenants, shutdown.clone()));

    spawn_pulse(Arc::clone(&state));
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(tenants = tenant_count, "wol-relay listening on {addr}");
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("wol-relay stopped");
    Ok(())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn shutdown_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(err = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(err = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown requested");
    shutdown.cancel();
}
