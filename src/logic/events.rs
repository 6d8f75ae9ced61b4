//! Event Emitter - Feed change notifications
//!
//! The renderer subscribes here instead of polling. Emitting never blocks and
//! never fails when nobody listens.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::logic::alert::AlertRecord;
use crate::logic::scan::{ScanSession, StopReason};

/// Event names
pub mod names {
    pub const ALERT_RAISED: &str = "feed:alert";
    pub const SCAN_STARTED: &str = "scan:started";
    pub const SCAN_STOPPED: &str = "scan:stopped";
    pub const FEED_RESET: &str = "feed:reset";
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum FeedEvent {
    #[serde(rename = "feed:alert")]
    AlertRaised(AlertRecord),
    #[serde(rename = "scan:started")]
    ScanStarted { scan_id: Uuid },
    #[serde(rename = "scan:stopped")]
    ScanStopped { session: ScanSession, reason: StopReason },
    #[serde(rename = "feed:reset")]
    FeedReset,
}

impl FeedEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FeedEvent::AlertRaised(_) => names::ALERT_RAISED,
            FeedEvent::ScanStarted { .. } => names::SCAN_STARTED,
            FeedEvent::ScanStopped { .. } => names::SCAN_STOPPED,
            FeedEvent::FeedReset => names::FEED_RESET,
        }
    }
}

/// Cloneable emitter handle
#[derive(Debug, Clone)]
pub struct FeedEvents {
    sender: broadcast::Sender<FeedEvent>,
}

impl FeedEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: FeedEvent) {
        let name = event.name();
        // Err only means no live receiver
        if self.sender.send(event).is_err() {
            log::trace!("No subscribers, event '{}' dropped", name);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for FeedEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let events = FeedEvents::new();
        events.emit(FeedEvent::FeedReset);
        assert_eq!(events.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_receives_in_order() {
        let events = FeedEvents::new();
        let mut rx = events.subscribe();
        let id = Uuid::new_v4();

        events.emit(FeedEvent::ScanStarted { scan_id: id });
        events.emit(FeedEvent::FeedReset);

        match rx.try_recv() {
            Ok(FeedEvent::ScanStarted { scan_id }) => assert_eq!(scan_id, id),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Ok(FeedEvent::FeedReset)));
    }

    #[test]
    fn test_event_json_tag() {
        let json = serde_json::to_value(FeedEvent::FeedReset).unwrap();
        assert_eq!(json["event"], names::FEED_RESET);
    }
}
