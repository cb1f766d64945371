//! Registry port — read entity states and command actuators.
//!
//! The registry owns every live value (temperatures, switch states, mode,
//! occupancy). The controller keeps nothing between evaluations and reads
//! through this port each time.

use std::future::Future;

use heatctl_domain::error::HeatingError;
use heatctl_domain::id::ExternalRef;
use heatctl_domain::state::StateValue;
use heatctl_domain::thermostat::ThermostatState;

/// Access to the external entity registry.
///
/// Implementations must be cheap to call repeatedly; the controller reads
/// every configured entity on each evaluation.
pub trait StateRegistry: Send + Sync {
    /// Current state of an entity, `None` if it has none.
    fn get_state(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<Option<StateValue>, HeatingError>> + Send;

    /// Whether the registry knows the entity at all.
    fn contains(&self, entity: &ExternalRef)
    -> impl Future<Output = Result<bool, HeatingError>> + Send;

    /// Turn a switch on or off. Must be a no-op when already in that state.
    fn write_switch(
        &self,
        entity: &ExternalRef,
        on: bool,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send;

    /// Replace the displayed state of a thermostat.
    fn publish_thermostat(
        &self,
        entity: &ExternalRef,
        state: &ThermostatState,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send;

    /// Send a setpoint command to the thermostat's device.
    fn command_setpoint(
        &self,
        entity: &ExternalRef,
        target: f64,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send;

    /// Numeric reading; `None` when missing, a sentinel, or not a number.
    fn read_numeric(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<Option<f64>, HeatingError>> + Send {
        async move {
            let state = self.get_state(entity).await?;
            Ok(state.as_ref().and_then(StateValue::as_f64))
        }
    }

    /// Boolean reading (`on`, any case, is true); `None` when missing or a sentinel.
    fn read_boolean(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<Option<bool>, HeatingError>> + Send {
        async move {
            let state = self.get_state(entity).await?;
            Ok(state.as_ref().and_then(StateValue::as_bool))
        }
    }

    /// Lower-cased enumerated reading; `None` when missing or a sentinel.
    fn read_enum(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<Option<String>, HeatingError>> + Send {
        async move {
            let state = self.get_state(entity).await?;
            Ok(state.as_ref().and_then(StateValue::as_enum))
        }
    }
}

impl<T: StateRegistry> StateRegistry for std::sync::Arc<T> {
    fn get_state(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<Option<StateValue>, HeatingError>> + Send {
        (**self).get_state(entity)
    }

    fn contains(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<bool, HeatingError>> + Send {
        (**self).contains(entity)
    }

    fn write_switch(
        &self,
        entity: &ExternalRef,
        on: bool,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send {
        (**self).write_switch(entity, on)
    }

    fn publish_thermostat(
        &self,
        entity: &ExternalRef,
        state: &ThermostatState,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send {
        (**self).publish_thermostat(entity, state)
    }

    fn command_setpoint(
        &self,
        entity: &ExternalRef,
        target: f64,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send {
        (**self).command_setpoint(entity, target)
    }
}
