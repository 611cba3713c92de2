//! Real-time event fan-out over a tokio broadcast channel

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::events::RealtimeEvent;
use crate::infrastructure::observability::record_realtime_event;

/// Slow receivers lose events beyond this many
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Publishes change events to every connected client
///
/// Sending never fails: with no subscribers the event is dropped.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<RealtimeEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns the number of subscribers that received the event
    pub fn send(&self, event: RealtimeEvent) -> usize {
        let name = event.name();
        let receivers = self.sender.send(event).unwrap_or_default();

        debug!(event = name, receivers, "Realtime event published");
        record_realtime_event(name, receivers);

        receivers
    }

    /// Events sent before subscribing are not received
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
