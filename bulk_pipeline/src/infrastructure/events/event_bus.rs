// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Broadcast Cache Event Bus

use tokio::sync::broadcast;

use bulk_pipeline_domain::CacheEvent;

const DEFAULT_CAPACITY: usize = 1024;

/// A fan-out publisher subscribers attach to independently; a slow or
/// absent subscriber never blocks publication (§4.6: "subscribers must
/// not raise").
pub struct CacheEventBus {
    sender: broadcast::Sender<CacheEvent>,
}

impl CacheEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.sender.subscribe()
    }

    /// Publishes `event`; a lagging-subscriber error from `send` (no
    /// listeners currently attached) is deliberately swallowed rather
    /// than propagated — cache-consistency failures never abort the
    /// triggering write.
    pub fn publish(&self, event: CacheEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for CacheEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = CacheEventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(CacheEvent::Created {
            id: "TKT-1".into(),
            snapshot: serde_json::json!({"status": "OPEN"}),
        });
        let event = rx.recv().await.unwrap();
        assert_eq!(event.id(), Some("TKT-1"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bus = CacheEventBus::new();
        bus.publish(CacheEvent::Rolledback { meta: serde_json::json!({}) });
    }
}
