//! Call events
//!
//! Phones created with an [`EventSender`] publish one [`PhoneEvent`] per call
//! attempt and one per fired release. Delivery is best effort: with no
//! subscriber the event is dropped.

use std::time::Duration;

use tokio::sync::broadcast;

/// Capacity of channels created by [`event_channel`]
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Sending half shared by every phone of a simulation
pub type EventSender = broadcast::Sender<PhoneEvent>;

/// Receiving half for observers
pub type EventReceiver = broadcast::Receiver<PhoneEvent>;

/// Something that happened to a pair of phones
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneEvent {
    /// Callee accepted; both phones busy for `duration`
    CallConnected {
        from: String,
        to: String,
        duration: Duration,
    },
    /// Callee declined
    CallRejected { from: String, to: String },
    /// Callee was in another conversation
    DestinationBusy { from: String, to: String },
    /// Caller tried to dial while in a conversation
    SelfBusy { number: String },
    /// A conversation timer fired and returned phones to idle
    Released { first: String, second: String },
}

/// Create a broadcast channel for phone events
pub fn event_channel() -> (EventSender, EventReceiver) {
    broadcast::channel(DEFAULT_EVENT_CAPACITY)
}

pub(crate) fn publish(events: Option<&EventSender>, event: PhoneEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let (tx, rx) = event_channel();
        drop(rx);
        publish(Some(&tx), PhoneEvent::SelfBusy { number: "1".to_string() });
        publish(None, PhoneEvent::SelfBusy { number: "1".to_string() });
    }
}
