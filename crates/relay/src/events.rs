// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events pushed to listeners over the event stream.
//!
//! Each event is a single `data:` line. Listening agents match the body by
//! exact string or prefix, so these literals are part of the wire contract.

use axum::response::sse::Event;

/// Body prefix for trigger events.
pub const SEND_PACKET_PREFIX: &str = "SEND_PACKET_TO_MAC ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Admission acknowledgement, sent once to the new listener only.
    Connected,
    /// Liveness heartbeat.
    Ping,
    /// Wake request for the given device.
    SendPacket { device: String },
}

impl RelayEvent {
    /// Event body as written after `data: `.
    pub fn body(&self) -> String {
        match self {
            Self::Connected => "CONNECTED".to_owned(),
            Self::Ping => "PING".to_owned(),
            Self::SendPacket { device } => format!("{SEND_PACKET_PREFIX}{device}"),
        }
    }

    pub fn to_sse(&self) -> Event {
        Event::default().data(self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_match_wire_contract() {
        assert_eq!(RelayEvent::Connected.body(), "CONNECTED");
        assert_eq!(RelayEvent::Ping.body(), "PING");
        let ev = RelayEvent::SendPacket { device: "AA:BB:CC:DD:EE:FF".to_owned() };
        assert_eq!(ev.body(), "SEND_PACKET_TO_MAC AA:BB:CC:DD:EE:FF");
    }
}
