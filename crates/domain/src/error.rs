//! Common error types used across the workspace.
//!
//! Missing or unreadable sensor data is **not** an error: it is carried as
//! `Option` values and the affected room or thermostat is skipped. Only
//! configuration problems and failures at the registry boundary end up here.

use crate::id::ExternalRef;

/// Boxed error coming from an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for heatctl operations.
#[derive(Debug, thiserror::Error)]
pub enum HeatingError {
    /// Configuration is malformed or references unknown entities. Fatal at startup.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Reading from the registry failed (timeout, transport, ...).
    #[error("registry error")]
    Registry(#[source] BoxError),

    /// Commanding a switch or thermostat failed.
    #[error("failed to actuate {entity}")]
    Actuation {
        entity: ExternalRef,
        #[source]
        source: BoxError,
    },
}

/// Configuration validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A required field was not provided.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field was provided but holds an empty identifier.
    #[error("field `{0}` must not be empty")]
    EmptyIdentifier(&'static str),

    /// No room was configured.
    #[error("at least one room must be configured")]
    NoRooms,

    /// A room lists no thermostat.
    #[error("room #{room} (sensor `{sensor}`) has no thermostats")]
    NoThermostats { room: usize, sensor: ExternalRef },

    /// Hysteresis must be a finite, non-negative number.
    #[error("hysteresis must be a finite non-negative number, got {0}")]
    InvalidHysteresis(f64),

    /// Minimum temperature must be finite.
    #[error("minimum temperature must be a finite number, got {0}")]
    InvalidMinTemperature(f64),

    /// A configured identifier does not exist in the registry.
    #[error("entity `{0}` does not exist")]
    UnknownEntity(ExternalRef),
}
