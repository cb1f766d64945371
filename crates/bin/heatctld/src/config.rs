//! Configuration loading — TOML file with environment variable overrides.
//!
//! Reads `heatctl.toml` from the working directory, or the file named by
//! `HEATCTL_CONFIG`. The heating section has no usable defaults, so the file
//! is required. Environment variables take precedence over file values.

use std::collections::BTreeMap;

use serde::Deserialize;

use heatctl_domain::config::{HeatingConfig, Room};
use heatctl_domain::id::ExternalRef;

const DEFAULT_PATH: &str = "heatctl.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Entities and tunables driving the controller.
    pub heating: HeatingSection,
    /// Initial registry content.
    pub simulation: SimulationConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// `[heating]` section, checked when turned into a [`HeatingConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HeatingSection {
    pub switch_heating: Option<String>,
    pub somebody_home: Option<String>,
    pub temperature_vacation: Option<String>,
    pub heating_mode: Option<String>,
    pub hysteresis: Option<f64>,
    pub min_temperature: Option<f64>,
    pub rooms: Vec<RoomSection>,
}

/// One `[[heating.rooms]]` entry.
#[derive(Debug, Deserialize)]
pub struct RoomSection {
    pub sensor: String,
    pub day_night: String,
    pub temperature_day: String,
    pub temperature_night: String,
    pub thermostats: OneOrMany,
}

/// A single identifier or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// `[simulation]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Entity states loaded into the registry before startup.
    pub states: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from `HEATCTL_CONFIG` or `heatctl.toml`, then
    /// apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HEATCTL_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HEATCTL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Build the validated controller configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when a required identifier is
    /// missing or the rooms are inconsistent.
    pub fn heating_config(&self) -> Result<HeatingConfig, ConfigError> {
        let section = &self.heating;
        let mut builder = HeatingConfig::builder();
        if let Some(id) = &section.switch_heating {
            builder = builder.switch_heating(id.as_str());
        }
        if let Some(id) = &section.somebody_home {
            builder = builder.somebody_home(id.as_str());
        }
        if let Some(id) = &section.temperature_vacation {
            builder = builder.temperature_vacation(id.as_str());
        }
        if let Some(id) = &section.heating_mode {
            builder = builder.heating_mode(id.as_str());
        }
        if let Some(hysteresis) = section.hysteresis {
            builder = builder.hysteresis(hysteresis);
        }
        if let Some(min_temperature) = section.min_temperature {
            builder = builder.min_temperature(min_temperature);
        }
        for room in &section.rooms {
            builder = builder.room(room.to_room());
        }
        Ok(builder.build()?)
    }

    /// Seeded states as `(entity, value)` pairs.
    pub fn initial_states(&self) -> impl Iterator<Item = (&str, &str)> {
        self.simulation
            .states
            .iter()
            .map(|(entity, value)| (entity.as_str(), value.as_str()))
    }
}

impl RoomSection {
    fn to_room(&self) -> Room {
        let thermostats = match &self.thermostats {
            OneOrMany::One(id) => vec![ExternalRef::from(id.as_str())],
            OneOrMany::Many(ids) => ids.iter().map(|id| ExternalRef::from(id.as_str())).collect(),
        };
        Room {
            sensor: self.sensor.as_str().into(),
            day_night: self.day_night.as_str().into(),
            temperature_day: self.temperature_day.as_str().into(),
            temperature_night: self.temperature_night.as_str().into(),
            thermostats,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "heatctld=info,heatctl_app=info,heatctl_adapter_memory=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Validation(#[from] heatctl_domain::error::ConfigError),
}
