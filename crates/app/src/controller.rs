//! Heating controller — reacts to registry state changes by re-evaluating the
//! boiler and the thermostats.
//!
//! The controller holds only the read-only configuration. Every evaluation
//! reads the live values from the registry, so a failed cycle is simply
//! retried by the next event. Whole cycles are serialised by an async mutex:
//! two evaluations never interleave, whatever the caller's threading model.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use heatctl_domain::aggregate::{AggregateReading, RoomSample, effective_target};
use heatctl_domain::config::{HeatingConfig, Room};
use heatctl_domain::decision::{DecisionInput, decide_heating};
use heatctl_domain::error::{ConfigError, HeatingError};
use heatctl_domain::event::Event;
use heatctl_domain::mode::HeatingMode;

use crate::event_router::Notification;
use crate::ports::StateRegistry;
use crate::thermostat_sync::SyncScope;

/// Reactive heating controller.
pub struct HeatingController<R> {
    pub(crate) config: Arc<HeatingConfig>,
    pub(crate) registry: R,
    cycle: Mutex<()>,
}

impl<R> HeatingController<R>
where
    R: StateRegistry,
{
    /// Create a new controller.
    pub fn new(config: Arc<HeatingConfig>, registry: R) -> Self {
        Self {
            config,
            registry,
            cycle: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &HeatingConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Make sure every configured entity exists in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEntity`] for the first missing entity,
    /// or a registry error.
    pub async fn verify_entities(&self) -> Result<(), HeatingError> {
        for entity in self.config.entities() {
            if !self.registry.contains(entity).await? {
                return Err(ConfigError::UnknownEntity(entity.clone()).into());
            }
        }
        Ok(())
    }

    /// Verify the configuration against the registry, then converge: one
    /// routine heating decision followed by a full thermostat sync.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an entity is unknown, or any
    /// registry/actuation error raised during the first evaluation.
    pub async fn start(&self) -> Result<(), HeatingError> {
        let _cycle = self.cycle.lock().await;
        self.verify_entities().await?;
        self.update_heating(false).await?;
        self.update_thermostats(SyncScope::All).await?;
        tracing::info!(rooms = self.config.rooms.len(), "ready for action");
        Ok(())
    }

    /// Route one state change to the re-evaluations it calls for.
    ///
    /// # Errors
    ///
    /// Returns the first registry or actuation error; the rest of the cycle
    /// is abandoned.
    pub async fn process_event(&self, event: &Event) -> Result<(), HeatingError> {
        let _cycle = self.cycle.lock().await;
        for notification in Notification::classify(&self.config, event) {
            tracing::debug!(entity = %event.entity, ?notification, "dispatching");
            self.dispatch(&notification).await?;
        }
        Ok(())
    }

    /// Full re-evaluation: heating decision then every thermostat.
    ///
    /// # Errors
    ///
    /// Returns the first registry or actuation error.
    pub async fn resync(&self) -> Result<(), HeatingError> {
        let _cycle = self.cycle.lock().await;
        self.update_heating(false).await?;
        self.update_thermostats(SyncScope::All).await?;
        Ok(())
    }

    /// Consume events one at a time until the bus closes.
    ///
    /// A failing cycle is logged and the loop moves on. When the receiver
    /// lagged behind and events were dropped, a full resync replaces them.
    pub async fn run(&self, receiver: broadcast::Receiver<Event>) {
        let mut events = BroadcastStream::new(receiver);
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => {
                    if let Err(err) = self.process_event(&event).await {
                        tracing::error!(entity = %event.entity, error = %err, "evaluation aborted");
                    }
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event receiver lagged, resynchronising");
                    if let Err(err) = self.resync().await {
                        tracing::error!(error = %err, "resynchronisation aborted");
                    }
                }
            }
        }
        tracing::info!("event bus closed, controller stopped");
    }

    /// Run the heating decision and switch the boiler if needed.
    ///
    /// Returns whether the switch was commanded.
    pub(crate) async fn update_heating(&self, force: bool) -> Result<bool, HeatingError> {
        let Some(mode) = self.mode().await? else {
            tracing::warn!(entity = %self.config.heating_mode, "heating mode unresolvable, skipping heating update");
            return Ok(false);
        };
        let vacation = self.vacation_target().await?;

        let mut samples = Vec::with_capacity(self.config.rooms.len());
        for room in &self.config.rooms {
            let temperature = self.registry.read_numeric(&room.sensor).await?;
            if temperature.is_none() {
                tracing::debug!(sensor = %room.sensor, "temperature unresolvable, room skipped");
                continue;
            }
            let target = self.room_target(room, Some(mode), vacation).await?;
            if target.is_none() {
                tracing::debug!(sensor = %room.sensor, "target unresolvable, room only counts for frost protection");
            }
            samples.push(RoomSample::new(temperature, target));
        }
        let aggregate = AggregateReading::from_samples(samples, self.config.tunables.hysteresis);

        let is_heating = self.is_heating().await?;
        let input = DecisionInput {
            mode,
            aggregate,
            is_home: self.is_somebody_home().await?,
            is_heating,
            force,
        };
        let decision = decide_heating(&input, &self.config.tunables);
        tracing::debug!(
            %mode,
            minimum = ?aggregate.minimum,
            some_below = aggregate.some_below,
            all_above = aggregate.all_above,
            is_home = input.is_home,
            is_heating,
            force,
            ?decision,
            "heating evaluated"
        );

        let Some(on) = decision.switch_command(is_heating) else {
            return Ok(false);
        };
        tracing::info!(
            switch = %self.config.switch_heating,
            "turning heating {}",
            if on { "on" } else { "off" }
        );
        self.registry
            .write_switch(&self.config.switch_heating, on)
            .await?;
        Ok(true)
    }

    /// Current heating mode; `None` when missing or not a known mode.
    pub(crate) async fn mode(&self) -> Result<Option<HeatingMode>, HeatingError> {
        let Some(raw) = self.registry.read_enum(&self.config.heating_mode).await? else {
            return Ok(None);
        };
        match raw.parse() {
            Ok(mode) => Ok(Some(mode)),
            Err(err) => {
                tracing::warn!(entity = %self.config.heating_mode, error = %err, "ignoring heating mode");
                Ok(None)
            }
        }
    }

    /// Whether the boiler runs. An unresolvable switch counts as off.
    pub(crate) async fn is_heating(&self) -> Result<bool, HeatingError> {
        let on = self
            .registry
            .read_boolean(&self.config.switch_heating)
            .await?;
        Ok(on.unwrap_or(false))
    }

    /// Whether somebody is home. Unresolvable occupancy counts as away.
    pub(crate) async fn is_somebody_home(&self) -> Result<bool, HeatingError> {
        let home = self
            .registry
            .read_boolean(&self.config.somebody_home)
            .await?;
        Ok(home.unwrap_or(false))
    }

    pub(crate) async fn vacation_target(&self) -> Result<Option<f64>, HeatingError> {
        self.registry
            .read_numeric(&self.config.temperature_vacation)
            .await
    }

    /// Target for one room under the given mode.
    pub(crate) async fn room_target(
        &self,
        room: &Room,
        mode: Option<HeatingMode>,
        vacation: Option<f64>,
    ) -> Result<Option<f64>, HeatingError> {
        if mode.is_some_and(HeatingMode::is_vacation) {
            return Ok(vacation);
        }
        let is_day = self.registry.read_boolean(&room.day_night).await?;
        let day = self.registry.read_numeric(&room.temperature_day).await?;
        let night = self.registry.read_numeric(&room.temperature_night).await?;
        Ok(effective_target(mode, vacation, is_day, day, night))
    }
}
