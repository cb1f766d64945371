//! End-to-end tests for the full heatctld stack.
//!
//! Each test wires the real pieces together (in-process event bus, in-memory
//! registry, heating controller) and feeds state changes through the
//! registry. Events are pumped by hand so every assertion sees a settled
//! system.

use std::sync::Arc;

use heatctl_adapter_memory::InMemoryRegistry;
use heatctl_app::controller::HeatingController;
use heatctl_app::event_bus::InProcessEventBus;
use heatctl_domain::config::{HeatingConfig, Room};
use heatctl_domain::error::{ConfigError, HeatingError};
use heatctl_domain::event::Event;
use heatctl_domain::id::ExternalRef;
use heatctl_domain::mode::HvacMode;
use heatctl_domain::state::StateValue;
use tokio::sync::broadcast::{self, error::TryRecvError};

type Registry = InMemoryRegistry<Arc<InProcessEventBus>>;

struct Harness {
    registry: Arc<Registry>,
    controller: HeatingController<Arc<Registry>>,
    events: broadcast::Receiver<Event>,
}

fn config() -> HeatingConfig {
    HeatingConfig::builder()
        .switch_heating("switch.boiler")
        .somebody_home("binary_sensor.somebody_home")
        .temperature_vacation("input_number.temperature_vacation")
        .heating_mode("input_select.heating_mode")
        .room(Room {
            sensor: "sensor.living".into(),
            day_night: "input_boolean.daytime".into(),
            temperature_day: "input_number.living_day".into(),
            temperature_night: "input_number.living_night".into(),
            thermostats: vec!["climate.living".into()],
        })
        .room(Room {
            sensor: "sensor.bedroom".into(),
            day_night: "input_boolean.daytime".into(),
            temperature_day: "input_number.bedroom_day".into(),
            temperature_night: "input_number.bedroom_night".into(),
            thermostats: vec!["climate.bedroom_window".into(), "climate.bedroom_door".into()],
        })
        .build()
        .unwrap()
}

fn initial_states() -> Vec<(&'static str, &'static str)> {
    vec![
        ("switch.boiler", "off"),
        ("binary_sensor.somebody_home", "off"),
        ("input_number.temperature_vacation", "18"),
        ("input_select.heating_mode", "eco"),
        ("input_boolean.daytime", "on"),
        ("sensor.living", "21.5"),
        ("input_number.living_day", "21"),
        ("input_number.living_night", "18"),
        ("climate.living", "off"),
        ("sensor.bedroom", "20"),
        ("input_number.bedroom_day", "19"),
        ("input_number.bedroom_night", "16"),
        ("climate.bedroom_window", "off"),
        ("climate.bedroom_door", "off"),
    ]
}

impl Harness {
    fn new(states: Vec<(&'static str, &'static str)>) -> Self {
        let bus = Arc::new(InProcessEventBus::new(64));
        let events = bus.subscribe();
        let registry = Arc::new(InMemoryRegistry::new(bus).with_states(states));
        let controller = HeatingController::new(Arc::new(config()), Arc::clone(&registry));
        Self {
            registry,
            controller,
            events,
        }
    }

    async fn started() -> Self {
        let mut harness = Self::new(initial_states());
        harness.controller.start().await.unwrap();
        harness.settle().await;
        harness
    }

    /// Process queued events, including the ones they cause, until none is left.
    async fn settle(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.controller.process_event(&event).await.unwrap(),
                Err(TryRecvError::Empty) => break,
                Err(err) => panic!("event bus failure: {err}"),
            }
        }
    }

    async fn set(&mut self, entity: &str, value: &str) {
        self.registry.set_state(entity, value).await.unwrap();
        self.settle().await;
    }

    fn boiler(&self) -> Option<bool> {
        self.registry
            .state(&ExternalRef::from("switch.boiler"))
            .as_ref()
            .and_then(StateValue::as_bool)
    }

    fn thermostat(&self, id: &str) -> (f64, f64, HvacMode) {
        let state = self.registry.thermostat(&ExternalRef::from(id)).unwrap();
        (state.temperature, state.current_temperature, state.hvac_mode)
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_sync_every_thermostat_on_startup() {
    let harness = Harness::started().await;

    assert_eq!(harness.boiler(), Some(false));
    assert_eq!(harness.thermostat("climate.living"), (21.0, 21.5, HvacMode::Off));
    assert_eq!(harness.thermostat("climate.bedroom_window"), (19.0, 20.0, HvacMode::Off));
    assert_eq!(harness.thermostat("climate.bedroom_door"), (19.0, 20.0, HvacMode::Off));
    assert_eq!(harness.registry.setpoint_commands(), 3);
}

#[tokio::test]
async fn should_refuse_to_start_when_entity_unknown() {
    let states = initial_states()
        .into_iter()
        .filter(|(entity, _)| *entity != "input_number.bedroom_night")
        .collect();
    let harness = Harness::new(states);

    let err = harness.controller.start().await.unwrap_err();

    assert!(matches!(
        err,
        HeatingError::Config(ConfigError::UnknownEntity(ref id)) if id.as_str() == "input_number.bedroom_night"
    ));
    assert_eq!(harness.registry.setpoint_commands(), 0);
}

#[tokio::test]
async fn should_turn_heating_on_at_startup_when_room_is_cold() {
    let mut states = initial_states();
    states.retain(|(entity, _)| *entity != "sensor.bedroom");
    states.push(("sensor.bedroom", "17.5"));
    let mut harness = Harness::new(states);

    harness.controller.start().await.unwrap();
    harness.settle().await;

    assert_eq!(harness.boiler(), Some(true));
    assert_eq!(harness.thermostat("climate.living").2, HvacMode::Heat);
}

// ---------------------------------------------------------------------------
// Hysteresis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_cycle_boiler_around_dead_band() {
    let mut harness = Harness::started().await;

    harness.set("sensor.living", "20.2").await;
    assert_eq!(harness.boiler(), Some(false), "inside the band");

    harness.set("sensor.living", "19.9").await;
    assert_eq!(harness.boiler(), Some(true), "below the band");
    assert_eq!(harness.thermostat("climate.bedroom_door").2, HvacMode::Heat);

    harness.set("sensor.living", "20.5").await;
    assert_eq!(harness.boiler(), Some(true), "still warming up");

    harness.set("sensor.living", "21").await;
    assert_eq!(harness.boiler(), Some(false), "target reached");
    assert_eq!(harness.thermostat("climate.living"), (21.0, 21.0, HvacMode::Off));
}

#[tokio::test]
async fn should_protect_against_frost_when_mode_off() {
    let mut harness = Harness::started().await;

    harness.set("input_select.heating_mode", "off").await;
    assert_eq!(harness.boiler(), Some(false));

    harness.set("sensor.bedroom", "9.5").await;
    assert_eq!(harness.boiler(), Some(true));
}

// ---------------------------------------------------------------------------
// Occupancy, mode and vacation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_heat_when_somebody_arrives_in_auto_mode() {
    let mut harness = Harness::started().await;
    harness.set("input_select.heating_mode", "auto").await;
    harness.set("sensor.living", "20.8").await;
    assert_eq!(harness.boiler(), Some(false));

    harness.set("binary_sensor.somebody_home", "on").await;

    assert_eq!(harness.boiler(), Some(true));
    assert_eq!(harness.thermostat("climate.living").2, HvacMode::Heat);
}

#[tokio::test]
async fn should_stop_heating_when_everybody_leaves() {
    let mut harness = Harness::started().await;
    harness.set("binary_sensor.somebody_home", "on").await;
    harness.set("input_select.heating_mode", "on").await;
    harness.set("sensor.living", "20.8").await;
    harness.set("input_select.heating_mode", "eco").await;
    assert_eq!(harness.boiler(), Some(true), "inside the band");

    harness.set("binary_sensor.somebody_home", "off").await;

    assert_eq!(harness.boiler(), Some(false));
}

#[tokio::test]
async fn should_follow_vacation_target_in_vacation_mode() {
    let mut harness = Harness::started().await;
    harness.set("input_select.heating_mode", "vacation").await;
    assert_eq!(harness.thermostat("climate.living").0, 18.0);

    harness.set("input_number.temperature_vacation", "16").await;

    for thermostat in ["climate.living", "climate.bedroom_window", "climate.bedroom_door"] {
        assert_eq!(harness.thermostat(thermostat).0, 16.0, "{thermostat}");
    }
    assert_eq!(harness.registry.setpoint(&ExternalRef::from("climate.living")), Some(16.0));
}

#[tokio::test]
async fn should_switch_targets_with_day_night_flag() {
    let mut harness = Harness::started().await;

    harness.set("input_boolean.daytime", "off").await;

    assert_eq!(harness.thermostat("climate.living").0, 18.0);
    assert_eq!(harness.thermostat("climate.bedroom_door").0, 16.0);
}

// ---------------------------------------------------------------------------
// Self-healing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_resync_only_the_blanked_thermostat() {
    let mut harness = Harness::started().await;
    let before = harness.registry.setpoint_commands();

    harness.set("climate.bedroom_door", "unavailable").await;

    assert_eq!(harness.registry.setpoint_commands(), before + 1);
    assert_eq!(
        harness.registry.state(&ExternalRef::from("climate.bedroom_door")),
        Some(StateValue::parse("off"))
    );
}

#[tokio::test]
async fn should_keep_working_after_sensor_goes_unavailable() {
    let mut harness = Harness::started().await;

    harness.set("sensor.living", "unavailable").await;
    harness.set("sensor.bedroom", "17").await;

    assert_eq!(harness.boiler(), Some(true));
    assert_eq!(harness.thermostat("climate.living").1, 21.5, "last good record kept");
}
