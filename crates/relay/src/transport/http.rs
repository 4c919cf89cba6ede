// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the relay.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;

use crate::error::RelayError;
use crate::state::RelayState;
use crate::transport::auth::AuthedTenant;

/// Longest device identifier accepted on the trigger route.
const MAX_DEVICE_LEN: usize = 128;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub listener_count: usize,
}

/// `GET /sse/status`
pub async fn status(State(s): State<Arc<RelayState>>) -> impl IntoResponse {
    Json(StatusResponse { listener_count: s.registry.count() })
}

/// `POST /sse/{device}/on` — wake `device` through the tenant's listeners.
pub async fn trigger(
    State(s): State<Arc<RelayState>>,
    Extension(AuthedTenant(tenant)): Extension<AuthedTenant>,
    Path(device): Path<String>,
) -> Response {
    if !is_valid_device(&device) {
        return RelayError::BadRequest.to_http_response("invalid device identifier").into_response();
    }

    match s.dispatcher.dispatch(&tenant, &device).into_result() {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(code) => code.into_response(),
    }
}

/// Device ids end up inside a single `data:` line, so control characters
/// (newlines in particular) are refused. Whitespace is refused too; ids are
/// matched against allow-lists verbatim.
pub fn is_valid_device(device: &str) -> bool {
    !device.is_empty()
        && device.len() <= MAX_DEVICE_LEN
        && !device.chars().any(|c| c.is_control() || c.is_whitespace())
}
