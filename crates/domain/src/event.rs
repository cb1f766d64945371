//! Event — a state transition observed in the registry.
//!
//! The registry emits one event whenever an entity's state changes. The
//! controller routes it to the re-evaluation that the changed entity calls for.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, ExternalRef};
use crate::state::StateValue;
use crate::time::{Timestamp, now};

/// An immutable record of a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub entity: ExternalRef,
    /// Previous state; `None` when the entity had none.
    pub old: Option<StateValue>,
    /// New state; `None` when the entity was removed.
    pub new: Option<StateValue>,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a state-change event stamped with the current time.
    #[must_use]
    pub fn state_changed(
        entity: impl Into<ExternalRef>,
        old: Option<StateValue>,
        new: Option<StateValue>,
    ) -> Self {
        Self {
            id: EventId::new(),
            entity: entity.into(),
            old,
            new,
            timestamp: now(),
        }
    }

    /// Whether the new state carries no usable value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        StateValue::is_blank(self.new.as_ref())
    }
}
