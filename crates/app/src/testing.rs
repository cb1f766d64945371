//! Shared fakes for controller tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use heatctl_domain::config::{HeatingConfig, Room};
use heatctl_domain::error::HeatingError;
use heatctl_domain::id::ExternalRef;
use heatctl_domain::state::StateValue;
use heatctl_domain::thermostat::ThermostatState;

use crate::ports::StateRegistry;

pub const BOILER: &str = "switch.boiler";
pub const HOME: &str = "binary_sensor.somebody_home";
pub const VACATION: &str = "input_number.temperature_vacation";
pub const MODE: &str = "input_select.heating_mode";
pub const DAYTIME: &str = "input_boolean.daytime";
pub const LIVING_SENSOR: &str = "sensor.living_temperature";
pub const LIVING_DAY: &str = "input_number.living_day";
pub const LIVING_NIGHT: &str = "input_number.living_night";
pub const LIVING_THERMOSTAT: &str = "climate.living";
pub const BEDROOM_SENSOR: &str = "sensor.bedroom_temperature";
pub const BEDROOM_DAY: &str = "input_number.bedroom_day";
pub const BEDROOM_NIGHT: &str = "input_number.bedroom_night";
pub const BEDROOM_THERMOSTAT_A: &str = "climate.bedroom_window";
pub const BEDROOM_THERMOSTAT_B: &str = "climate.bedroom_door";

/// Two rooms sharing one day/night flag; the bedroom drives two thermostats.
pub fn heating_config() -> HeatingConfig {
    HeatingConfig::builder()
        .switch_heating(BOILER)
        .somebody_home(HOME)
        .temperature_vacation(VACATION)
        .heating_mode(MODE)
        .room(Room {
            sensor: LIVING_SENSOR.into(),
            day_night: DAYTIME.into(),
            temperature_day: LIVING_DAY.into(),
            temperature_night: LIVING_NIGHT.into(),
            thermostats: vec![LIVING_THERMOSTAT.into()],
        })
        .room(Room {
            sensor: BEDROOM_SENSOR.into(),
            day_night: DAYTIME.into(),
            temperature_day: BEDROOM_DAY.into(),
            temperature_night: BEDROOM_NIGHT.into(),
            thermostats: vec![BEDROOM_THERMOSTAT_A.into(), BEDROOM_THERMOSTAT_B.into()],
        })
        .build()
        .unwrap()
}

/// Eco mode, nobody home, boiler off, daytime; both rooms at or above target.
pub fn default_states() -> Vec<(&'static str, &'static str)> {
    vec![
        (BOILER, "off"),
        (HOME, "off"),
        (VACATION, "16"),
        (MODE, "eco"),
        (DAYTIME, "on"),
        (LIVING_SENSOR, "21.5"),
        (LIVING_DAY, "21"),
        (LIVING_NIGHT, "18"),
        (LIVING_THERMOSTAT, "off"),
        (BEDROOM_SENSOR, "20"),
        (BEDROOM_DAY, "19"),
        (BEDROOM_NIGHT, "16"),
        (BEDROOM_THERMOSTAT_A, "off"),
        (BEDROOM_THERMOSTAT_B, "off"),
    ]
}

/// In-memory registry recording every command it receives.
#[derive(Default)]
pub struct FakeRegistry {
    states: Mutex<HashMap<ExternalRef, StateValue>>,
    switch_writes: Mutex<Vec<(ExternalRef, bool)>>,
    published: Mutex<Vec<(ExternalRef, ThermostatState)>>,
    setpoints: Mutex<Vec<(ExternalRef, f64)>>,
    fail_switch: AtomicBool,
}

impl FakeRegistry {
    pub fn with_states(states: &[(&str, &str)]) -> Self {
        let registry = Self::default();
        for (entity, value) in states {
            registry.set(entity, value);
        }
        registry
    }

    pub fn seeded() -> Self {
        Self::with_states(&default_states())
    }

    pub fn set(&self, entity: &str, value: &str) {
        self.states
            .lock()
            .unwrap()
            .insert(ExternalRef::from(entity), StateValue::parse(value));
    }

    pub fn remove(&self, entity: &str) {
        self.states.lock().unwrap().remove(&ExternalRef::from(entity));
    }

    pub fn state(&self, entity: &str) -> Option<StateValue> {
        self.states
            .lock()
            .unwrap()
            .get(&ExternalRef::from(entity))
            .cloned()
    }

    pub fn fail_switch(&self) {
        self.fail_switch.store(true, Ordering::SeqCst);
    }

    pub fn switch_writes(&self) -> Vec<(ExternalRef, bool)> {
        self.switch_writes.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<(ExternalRef, ThermostatState)> {
        self.published.lock().unwrap().clone()
    }

    pub fn published_to(&self) -> Vec<String> {
        self.published()
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect()
    }

    pub fn setpoints(&self) -> Vec<(ExternalRef, f64)> {
        self.setpoints.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.switch_writes.lock().unwrap().clear();
        self.published.lock().unwrap().clear();
        self.setpoints.lock().unwrap().clear();
    }
}

impl StateRegistry for FakeRegistry {
    fn get_state(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<Option<StateValue>, HeatingError>> + Send {
        let result = self.states.lock().unwrap().get(entity).cloned();
        async move { Ok(result) }
    }

    fn contains(
        &self,
        entity: &ExternalRef,
    ) -> impl Future<Output = Result<bool, HeatingError>> + Send {
        let result = self.states.lock().unwrap().contains_key(entity);
        async move { Ok(result) }
    }

    fn write_switch(
        &self,
        entity: &ExternalRef,
        on: bool,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send {
        let result = if self.fail_switch.load(Ordering::SeqCst) {
            Err(HeatingError::Actuation {
                entity: entity.clone(),
                source: "relay offline".into(),
            })
        } else {
            self.switch_writes.lock().unwrap().push((entity.clone(), on));
            self.states
                .lock()
                .unwrap()
                .insert(entity.clone(), StateValue::switch(on));
            Ok(())
        };
        async move { result }
    }

    fn publish_thermostat(
        &self,
        entity: &ExternalRef,
        state: &ThermostatState,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send {
        self.published
            .lock()
            .unwrap()
            .push((entity.clone(), state.clone()));
        async { Ok(()) }
    }

    fn command_setpoint(
        &self,
        entity: &ExternalRef,
        target: f64,
    ) -> impl Future<Output = Result<(), HeatingError>> + Send {
        self.setpoints
            .lock()
            .unwrap()
            .push((entity.clone(), target));
        async { Ok(()) }
    }
}
