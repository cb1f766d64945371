//! Event router — maps a state change to the minimal re-evaluation it needs.

use heatctl_domain::config::HeatingConfig;
use heatctl_domain::error::HeatingError;
use heatctl_domain::event::Event;
use heatctl_domain::id::ExternalRef;
use heatctl_domain::state::StateValue;

use crate::controller::HeatingController;
use crate::ports::StateRegistry;
use crate::thermostat_sync::SyncScope;

/// Kind of change a state event stands for.
///
/// One entity may play several roles (a sensor shared by two rooms, a flag
/// used as both occupancy and day/night), so an event can yield several
/// notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    OccupancyChanged { home: Option<bool> },
    HeatSwitchChanged,
    VacationTargetChanged,
    ModeChanged,
    DayNightChanged(ExternalRef),
    TargetChanged(ExternalRef),
    SensorChanged(ExternalRef),
    /// A thermostat lost its displayed state.
    ThermostatBlanked(ExternalRef),
}

impl Notification {
    /// Notifications triggered by `event`, in dispatch order, without
    /// duplicates.
    #[must_use]
    pub fn classify(config: &HeatingConfig, event: &Event) -> Vec<Self> {
        let entity = &event.entity;
        let mut found = Vec::new();

        if *entity == config.somebody_home {
            found.push(Self::OccupancyChanged {
                home: event.new.as_ref().and_then(StateValue::as_bool),
            });
        }
        if *entity == config.switch_heating {
            found.push(Self::HeatSwitchChanged);
        }
        if *entity == config.temperature_vacation {
            found.push(Self::VacationTargetChanged);
        }
        if *entity == config.heating_mode {
            found.push(Self::ModeChanged);
        }
        for room in &config.rooms {
            if room.day_night == *entity {
                found.push(Self::DayNightChanged(entity.clone()));
            }
            if room.uses_target(entity) {
                found.push(Self::TargetChanged(entity.clone()));
            }
            if room.sensor == *entity {
                found.push(Self::SensorChanged(entity.clone()));
            }
            if room.has_thermostat(entity) && event.is_blank() {
                found.push(Self::ThermostatBlanked(entity.clone()));
            }
        }

        let mut unique = Vec::with_capacity(found.len());
        for notification in found {
            if !unique.contains(&notification) {
                unique.push(notification);
            }
        }
        unique
    }
}

impl<R> HeatingController<R>
where
    R: StateRegistry,
{
    pub(crate) async fn dispatch(&self, notification: &Notification) -> Result<(), HeatingError> {
        match notification {
            Notification::OccupancyChanged { home } => {
                match home {
                    Some(true) => tracing::info!("somebody came home"),
                    Some(false) => tracing::info!("nobody home"),
                    None => tracing::debug!("occupancy unresolvable"),
                }
                self.update_heating(true).await?;
                self.update_thermostats(SyncScope::All).await
            }
            Notification::HeatSwitchChanged => self.update_thermostats(SyncScope::All).await,
            Notification::VacationTargetChanged => {
                if !self.mode().await?.is_some_and(|mode| mode.is_vacation()) {
                    return Ok(());
                }
                self.update_heating(false).await?;
                self.update_thermostats(SyncScope::All).await
            }
            Notification::ModeChanged => {
                // a switch command comes back as a heat switch change
                if self.update_heating(false).await? {
                    return Ok(());
                }
                self.update_thermostats(SyncScope::All).await
            }
            Notification::DayNightChanged(id) => {
                self.update_heating(false).await?;
                self.update_thermostats(SyncScope::DayNight(id)).await
            }
            Notification::TargetChanged(id) => {
                self.update_heating(false).await?;
                self.update_thermostats(SyncScope::Target(id)).await
            }
            Notification::SensorChanged(id) => {
                self.update_heating(false).await?;
                self.update_thermostats(SyncScope::Sensor(id)).await
            }
            Notification::ThermostatBlanked(id) => {
                self.update_thermostats(SyncScope::Thermostat(id)).await
            }
        }
    }
}
