//! # heatctl-adapter-memory
//!
//! In-memory entity registry.
//!
//! Holds the current state of every entity and emits a state-change event on
//! the bus whenever a value actually changes, the way a home automation
//! registry would. Commands sent by the controller land here too:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `write_switch` | switch state becomes `on`/`off` (event on change) |
//! | `publish_thermostat` | record stored, state becomes the hvac mode (event on change) |
//! | `command_setpoint` | last setpoint stored, command counted, no state change |
//!
//! ## Dependency rule
//!
//! Depends on `heatctl-app` (port traits) and `heatctl-domain` only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use heatctl_app::ports::{EventPublisher, StateRegistry};
use heatctl_domain::error::HeatingError;
use heatctl_domain::event::Event;
use heatctl_domain::id::ExternalRef;
use heatctl_domain::state::StateValue;
use heatctl_domain::thermostat::ThermostatState;

/// Registry keeping every entity in memory.
pub struct InMemoryRegistry<P> {
    publisher: P,
    states: Mutex<HashMap<ExternalRef, StateValue>>,
    thermostats: Mutex<HashMap<ExternalRef, ThermostatState>>,
    setpoints: Mutex<HashMap<ExternalRef, f64>>,
    setpoint_commands: AtomicUsize,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P> InMemoryRegistry<P>
where
    P: EventPublisher + Send + Sync,
{
    /// Create an empty registry publishing changes to `publisher`.
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            states: Mutex::new(HashMap::new()),
            thermostats: Mutex::new(HashMap::new()),
            setpoints: Mutex::new(HashMap::new()),
            setpoint_commands: AtomicUsize::new(0),
        }
    }

    /// Seed initial states. No event is emitted.
    #[must_use]
    pub fn with_states<I, K, V>(self, states: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ExternalRef>,
        V: Into<StateValue>,
    {
        {
            let mut current = locked(&self.states);
            for (entity, value) in states {
                current.insert(entity.into(), value.into());
            }
        }
        self
    }

    /// Set the state of an entity, creating it if needed.
    ///
    /// Returns whether the value changed; an event is published only then.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be published.
    pub async fn set_state(
        &self,
        entity: impl Into<ExternalRef>,
        value: impl Into<StateValue>,
    ) -> Result<bool, HeatingError> {
        let entity = entity.into();
        let value = value.into();
        let old = {
            let mut states = locked(&self.states);
            let old = states.insert(entity.clone(), value.clone());
            if old.as_ref() == Some(&value) {
                return Ok(false);
            }
            old
        };
        tracing::debug!(%entity, %value, "state changed");
        self.publisher
            .publish(Event::state_changed(entity, old, Some(value)))
            .await?;
        Ok(true)
    }

    /// Drop an entity's state. Publishes an event with no new state when the
    /// entity existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be published.
    pub async fn remove_state(&self, entity: impl Into<ExternalRef>) -> Result<bool, HeatingError> {
        let entity = entity.into();
        let removed = locked(&self.states).remove(&entity);
        let Some(old) = removed else {
            return Ok(false);
        };
        tracing::debug!(%entity, "state removed");
        self.publisher
            .publish(Event::state_changed(entity, Some(old), None))
            .await?;
        Ok(true)
    }

    #[must_use]
    pub fn state(&self, entity: &ExternalRef) -> Option<StateValue> {
        locked(&self.states).get(entity).cloned()
    }

    /// Last record published to a thermostat.
    #[must_use]
    pub fn thermostat(&self, entity: &ExternalRef) -> Option<ThermostatState> {
        locked(&self.thermostats).get(entity).cloned()
    }

    /// Last setpoint commanded to a thermostat.
    #[must_use]
    pub fn setpoint(&self, entity: &ExternalRef) -> Option<f64> {
        locked(&self.setpoints).get(entity).copied()
    }

    /// Number of setpoint commands received so far.
    #[must_use]
    pub fn setpoint_commands(&self) -> usize {
        self.setpoint_commands.load(Ordering::Relaxed)
    }
}

impl<P> StateRegistry for InMemoryRegistry<P>
where
    P: EventPublisher + Send + Sync,
{
    async fn get_state(&self, entity: &ExternalRef) -> Result<Option<StateValue>, HeatingError> {
        Ok(self.state(entity))
    }

    async fn contains(&self, entity: &ExternalRef) -> Result<bool, HeatingError> {
        Ok(locked(&self.states).contains_key(entity))
    }

    async fn write_switch(&self, entity: &ExternalRef, on: bool) -> Result<(), HeatingError> {
        self.set_state(entity.clone(), StateValue::switch(on)).await?;
        Ok(())
    }

    async fn publish_thermostat(
        &self,
        entity: &ExternalRef,
        state: &ThermostatState,
    ) -> Result<(), HeatingError> {
        locked(&self.thermostats).insert(entity.clone(), state.clone());
        self.set_state(entity.clone(), state.hvac_mode.to_string())
            .await?;
        Ok(())
    }

    async fn command_setpoint(&self, entity: &ExternalRef, target: f64) -> Result<(), HeatingError> {
        locked(&self.setpoints).insert(entity.clone(), target);
        self.setpoint_commands.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
