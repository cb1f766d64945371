//! Record published to a thermostat for display.

use serde::{Deserialize, Serialize};

use crate::mode::HvacMode;

/// Displayed state of one thermostat.
///
/// Field names follow the climate attributes understood by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermostatState {
    /// Target temperature.
    pub temperature: f64,
    /// Temperature measured by the room sensor.
    pub current_temperature: f64,
    pub hvac_mode: HvacMode,
    pub hvac_modes: Vec<HvacMode>,
}

impl ThermostatState {
    #[must_use]
    pub fn new(target: f64, current: f64, is_heating: bool) -> Self {
        Self {
            temperature: target,
            current_temperature: current,
            hvac_mode: HvacMode::from_heating(is_heating),
            hvac_modes: HvacMode::ALLOWED.to_vec(),
        }
    }
}
