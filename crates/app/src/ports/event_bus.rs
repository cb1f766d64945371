//! Event bus port — publish state-change events.

use std::future::Future;

use heatctl_domain::error::HeatingError;
use heatctl_domain::event::Event;

/// Publishes state-change events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), HeatingError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), HeatingError>> + Send {
        (**self).publish(event)
    }
}
