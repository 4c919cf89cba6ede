// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP + SSE transport for the relay.

pub mod auth;
pub mod http;
pub mod sse;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::RelayState;

/// Build the axum `Router` with all relay routes.
///
/// Auth is a route layer, so it covers only the routes registered before it;
/// unmatched paths fall through to a plain 404.
pub fn build_router(state: Arc<RelayState>) -> Router {
    Router::new()
        // Listener stream
        .route("/sse/events", get(sse::open_stream))
        // Trigger
        .route("/sse/{device}/on", post(http::trigger))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::auth_layer))
        // Status (no auth)
        .route("/sse/status", get(http::status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
