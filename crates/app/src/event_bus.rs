//! In-process event bus backed by a tokio broadcast channel.
//!
//! The channel is bounded. A subscriber that falls more than `capacity`
//! events behind loses the oldest ones and is told how many on its next
//! receive. The controller answers that with a full resynchronisation.

use std::future::Future;

use tokio::sync::broadcast;

use heatctl_domain::error::HeatingError;
use heatctl_domain::event::Event;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped). Changes made before the controller
/// subscribes are covered by the full evaluation at startup.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), HeatingError>> + Send {
        // send only fails when nobody listens
        if self.sender.send(event).is_err() {
            tracing::trace!("no subscriber, event dropped");
        }
        async { Ok(()) }
    }
}
