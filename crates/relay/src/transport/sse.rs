// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener event stream.
//!
//! The response body owns the listener's registration guard. When the peer
//! disconnects or the server shuts down, hyper drops the body and the guard
//! removes the listener from the registry.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::Extension;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::events::RelayEvent;
use crate::registry::{ListenerGuard, Subscription};
use crate::state::RelayState;
use crate::transport::auth::AuthedTenant;

/// Stream of events for one admitted listener.
pub struct ListenerStream {
    events: mpsc::Receiver<RelayEvent>,
    _guard: ListenerGuard,
}

impl ListenerStream {
    pub fn new(sub: Subscription) -> Self {
        Self { events: sub.events, _guard: sub.guard }
    }
}

impl Stream for ListenerStream {
    type Item = RelayEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<RelayEvent>> {
        self.events.poll_recv(cx)
    }
}

/// `GET /sse/events` — register as a listener and hold the stream open.
pub async fn open_stream(
    State(s): State<Arc<RelayState>>,
    Extension(AuthedTenant(tenant)): Extension<AuthedTenant>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let sub = s.registry.admit(&tenant, s.config.listener_buffer());
    let stream = ListenerStream::new(sub)
        .take_until(s.shutdown.clone().cancelled_owned())
        .map(|event| Ok::<_, Infallible>(event.to_sse()));
    Sse::new(stream)
}
