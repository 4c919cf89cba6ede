// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::RelayError;
use crate::state::RelayState;
use crate::tenant::TenantDirectory;

/// Tenant resolved from the request's bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthedTenant(pub String);

/// Extract the credential from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, RelayError> {
    let header =
        headers.get("authorization").and_then(|v| v.to_str().ok()).ok_or(RelayError::Unauthorized)?;
    header.strip_prefix("Bearer ").ok_or(RelayError::Unauthorized)
}

/// Resolve the request's bearer credential to a tenant name.
pub fn authenticate(headers: &HeaderMap, tenants: &TenantDirectory) -> Result<String, RelayError> {
    let token = bearer_token(headers)?;
    tenants.resolve(token).map(str::to_owned).ok_or(RelayError::Unauthorized)
}

/// Axum middleware that resolves the caller's tenant.
///
/// On success the tenant is attached to the request as an [`AuthedTenant`]
/// extension.
pub async fn auth_layer(
    state: State<Arc<RelayState>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match authenticate(req.headers(), &state.tenants) {
        Ok(tenant) => {
            req.extensions_mut().insert(AuthedTenant(tenant));
            next.run(req).await
        }
        Err(code) => {
            let peer = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0);
            match peer {
                Some(addr) => tracing::warn!(peer = %addr, path = %req.uri().path(), "denied access"),
                None => tracing::warn!(path = %req.uri().path(), "denied access"),
            }
            code.into_response()
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
