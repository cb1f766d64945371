//! Heating configuration — rooms, global entities and tunables.
//!
//! A [`HeatingConfig`] is built once at startup, validated, and then shared
//! read-only (behind an `Arc`) with every evaluation. Nothing in it changes
//! for the lifetime of the process; all live values are read from the
//! registry on each evaluation.

use crate::error::ConfigError;
use crate::id::ExternalRef;

/// Default dead-band width, in degrees.
pub const DEFAULT_HYSTERESIS: f64 = 1.0;
/// Default frost-protection threshold, in degrees.
pub const DEFAULT_MIN_TEMPERATURE: f64 = 10.0;

/// One heated zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Temperature sensor. May be shared between rooms.
    pub sensor: ExternalRef,
    /// Boolean source: `on` selects the day target.
    pub day_night: ExternalRef,
    /// Numeric source holding the day setpoint.
    pub temperature_day: ExternalRef,
    /// Numeric source holding the night setpoint.
    pub temperature_night: ExternalRef,
    /// Thermostats driven by this room. Never empty.
    pub thermostats: Vec<ExternalRef>,
}

impl Room {
    #[must_use]
    pub fn has_thermostat(&self, thermostat: &ExternalRef) -> bool {
        self.thermostats.contains(thermostat)
    }

    /// Whether `entity` is this room's day or night target source.
    #[must_use]
    pub fn uses_target(&self, entity: &ExternalRef) -> bool {
        self.temperature_day == *entity || self.temperature_night == *entity
    }

    /// Every identifier the room references.
    pub fn entities(&self) -> impl Iterator<Item = &ExternalRef> {
        [
            &self.sensor,
            &self.day_night,
            &self.temperature_day,
            &self.temperature_night,
        ]
        .into_iter()
        .chain(&self.thermostats)
    }
}

/// Thresholds fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    /// Width of the dead-band below the target.
    pub hysteresis: f64,
    /// Below this temperature the boiler is forced on whatever the mode.
    pub min_temperature: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            hysteresis: DEFAULT_HYSTERESIS,
            min_temperature: DEFAULT_MIN_TEMPERATURE,
        }
    }
}

/// Whole-house configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatingConfig {
    /// Boiler relay.
    pub switch_heating: ExternalRef,
    /// Boolean "somebody home" source.
    pub somebody_home: ExternalRef,
    /// Numeric source for the vacation setpoint.
    pub temperature_vacation: ExternalRef,
    /// Enumerated mode source (`on`, `off`, `auto`, `eco`, `vacation`).
    pub heating_mode: ExternalRef,
    pub rooms: Vec<Room>,
    pub tunables: Tunables,
}

impl HeatingConfig {
    /// Create a builder for constructing a [`HeatingConfig`].
    #[must_use]
    pub fn builder() -> HeatingConfigBuilder {
        HeatingConfigBuilder::default()
    }

    /// Check configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when an identifier is empty, no room is
    /// configured, a room has no thermostat, or a tunable is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, id) in [
            ("switch_heating", &self.switch_heating),
            ("somebody_home", &self.somebody_home),
            ("temperature_vacation", &self.temperature_vacation),
            ("heating_mode", &self.heating_mode),
        ] {
            if id.is_blank() {
                return Err(ConfigError::EmptyIdentifier(field));
            }
        }
        if self.rooms.is_empty() {
            return Err(ConfigError::NoRooms);
        }
        for (index, room) in self.rooms.iter().enumerate() {
            if room.thermostats.is_empty() {
                return Err(ConfigError::NoThermostats {
                    room: index,
                    sensor: room.sensor.clone(),
                });
            }
            if room.entities().any(ExternalRef::is_blank) {
                return Err(ConfigError::EmptyIdentifier("rooms"));
            }
        }
        let Tunables {
            hysteresis,
            min_temperature,
        } = self.tunables;
        if !hysteresis.is_finite() || hysteresis < 0.0 {
            return Err(ConfigError::InvalidHysteresis(hysteresis));
        }
        if !min_temperature.is_finite() {
            return Err(ConfigError::InvalidMinTemperature(min_temperature));
        }
        Ok(())
    }

    /// Every identifier referenced by the configuration, deduplicated in
    /// first-seen order.
    #[must_use]
    pub fn entities(&self) -> Vec<&ExternalRef> {
        let globals = [
            &self.switch_heating,
            &self.somebody_home,
            &self.temperature_vacation,
            &self.heating_mode,
        ];
        dedup(
            globals
                .into_iter()
                .chain(self.rooms.iter().flat_map(|room| room.entities())),
        )
    }
}

fn dedup<'a>(ids: impl Iterator<Item = &'a ExternalRef>) -> Vec<&'a ExternalRef> {
    let mut seen: Vec<&ExternalRef> = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Step-by-step builder for [`HeatingConfig`].
#[derive(Debug, Default)]
pub struct HeatingConfigBuilder {
    switch_heating: Option<ExternalRef>,
    somebody_home: Option<ExternalRef>,
    temperature_vacation: Option<ExternalRef>,
    heating_mode: Option<ExternalRef>,
    rooms: Vec<Room>,
    tunables: Tunables,
}

impl HeatingConfigBuilder {
    #[must_use]
    pub fn switch_heating(mut self, id: impl Into<ExternalRef>) -> Self {
        self.switch_heating = Some(id.into());
        self
    }

    #[must_use]
    pub fn somebody_home(mut self, id: impl Into<ExternalRef>) -> Self {
        self.somebody_home = Some(id.into());
        self
    }

    #[must_use]
    pub fn temperature_vacation(mut self, id: impl Into<ExternalRef>) -> Self {
        self.temperature_vacation = Some(id.into());
        self
    }

    #[must_use]
    pub fn heating_mode(mut self, id: impl Into<ExternalRef>) -> Self {
        self.heating_mode = Some(id.into());
        self
    }

    #[must_use]
    pub fn room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    #[must_use]
    pub fn hysteresis(mut self, hysteresis: f64) -> Self {
        self.tunables.hysteresis = hysteresis;
        self
    }

    #[must_use]
    pub fn min_temperature(mut self, min_temperature: f64) -> Self {
        self.tunables.min_temperature = min_temperature;
        self
    }

    /// Consume the builder, validate, and return a [`HeatingConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if a global entity was not set,
    /// or any error raised by [`HeatingConfig::validate`].
    pub fn build(self) -> Result<HeatingConfig, ConfigError> {
        let config = HeatingConfig {
            switch_heating: self
                .switch_heating
                .ok_or(ConfigError::MissingField("switch_heating"))?,
            somebody_home: self
                .somebody_home
                .ok_or(ConfigError::MissingField("somebody_home"))?,
            temperature_vacation: self
                .temperature_vacation
                .ok_or(ConfigError::MissingField("temperature_vacation"))?,
            heating_mode: self
                .heating_mode
                .ok_or(ConfigError::MissingField("heating_mode"))?,
            rooms: self.rooms,
            tunables: self.tunables,
        };
        config.validate()?;
        Ok(config)
    }
}
