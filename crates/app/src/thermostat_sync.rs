//! Thermostat synchronizer — pushes target, current temperature and hvac
//! mode to the thermostats of the rooms in scope.

use heatctl_domain::config::Room;
use heatctl_domain::error::HeatingError;
use heatctl_domain::id::ExternalRef;
use heatctl_domain::thermostat::ThermostatState;

use crate::controller::HeatingController;
use crate::ports::StateRegistry;

/// Which thermostats a synchronisation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope<'a> {
    All,
    /// A single thermostat, in whichever room holds it.
    Thermostat(&'a ExternalRef),
    /// Rooms measured by this sensor.
    Sensor(&'a ExternalRef),
    /// Rooms following this day/night flag.
    DayNight(&'a ExternalRef),
    /// Rooms reading their day or night target from this source.
    Target(&'a ExternalRef),
}

impl SyncScope<'_> {
    #[must_use]
    pub fn includes(&self, room: &Room) -> bool {
        match self {
            Self::All => true,
            Self::Thermostat(id) => room.has_thermostat(id),
            Self::Sensor(id) => room.sensor == **id,
            Self::DayNight(id) => room.day_night == **id,
            Self::Target(id) => room.uses_target(id),
        }
    }

    #[must_use]
    pub fn includes_thermostat(&self, thermostat: &ExternalRef) -> bool {
        match self {
            Self::Thermostat(id) => *id == thermostat,
            _ => true,
        }
    }
}

impl<R> HeatingController<R>
where
    R: StateRegistry,
{
    /// Publish the displayed state and command the setpoint of every
    /// thermostat in scope.
    ///
    /// Rooms whose temperature or target cannot be resolved are skipped;
    /// nothing partial is ever published.
    pub(crate) async fn update_thermostats(&self, scope: SyncScope<'_>) -> Result<(), HeatingError> {
        let mode = self.mode().await?;
        let vacation = self.vacation_target().await?;
        let is_heating = self.is_heating().await?;

        for room in self.config.rooms.iter().filter(|room| scope.includes(room)) {
            let Some(current) = self.registry.read_numeric(&room.sensor).await? else {
                tracing::warn!(sensor = %room.sensor, "temperature unresolvable, thermostats not updated");
                continue;
            };
            let Some(target) = self.room_target(room, mode, vacation).await? else {
                tracing::warn!(sensor = %room.sensor, "target unresolvable, thermostats not updated");
                continue;
            };
            let state = ThermostatState::new(target, current, is_heating);

            for thermostat in room
                .thermostats
                .iter()
                .filter(|id| scope.includes_thermostat(id))
            {
                tracing::debug!(
                    %thermostat,
                    target,
                    current,
                    hvac_mode = %state.hvac_mode,
                    "updating thermostat"
                );
                self.registry.publish_thermostat(thermostat, &state).await?;
                self.registry.command_setpoint(thermostat, target).await?;
            }
        }
        Ok(())
    }
}
