//! Heating policy selected by the mode input, and the hvac mode shown on thermostats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Heating policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatingMode {
    /// Always heat.
    On,
    /// Never heat (frost protection still applies).
    Off,
    /// Heat whenever somebody is home, otherwise follow the hysteresis.
    Auto,
    /// Follow the hysteresis.
    Eco,
    /// Follow the hysteresis against the single vacation target.
    Vacation,
}

impl HeatingMode {
    #[must_use]
    pub fn is_vacation(self) -> bool {
        matches!(self, Self::Vacation)
    }
}

/// Returned when the mode input holds an unrecognised value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown heating mode `{0}`")]
pub struct UnknownModeError(pub String);

impl FromStr for HeatingMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "auto" => Ok(Self::Auto),
            "eco" => Ok(Self::Eco),
            "vacation" => Ok(Self::Vacation),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}

impl fmt::Display for HeatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Auto => f.write_str("auto"),
            Self::Eco => f.write_str("eco"),
            Self::Vacation => f.write_str("vacation"),
        }
    }
}

/// Operating mode displayed by a thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacMode {
    Heat,
    Off,
}

impl HvacMode {
    /// Modes a thermostat is allowed to show.
    pub const ALLOWED: [Self; 2] = [Self::Heat, Self::Off];

    /// `heat` while the boiler runs, `off` otherwise.
    #[must_use]
    pub fn from_heating(is_heating: bool) -> Self {
        if is_heating { Self::Heat } else { Self::Off }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heat => f.write_str("heat"),
            Self::Off => f.write_str("off"),
        }
    }
}
