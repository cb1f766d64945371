//! # heatctld — heating control daemon
//!
//! Composition root that wires the heating controller to an in-memory
//! registry and feeds it state changes read from stdin.
//!
//! ## Responsibilities
//! - Load configuration (`heatctl.toml`, env vars)
//! - Initialise `tracing` from the configured filter
//! - Seed the in-memory registry and construct the controller
//! - Start the controller, then run its event loop in the background
//! - Apply `entity_id value` lines from stdin until end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod driver;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use heatctl_adapter_memory::InMemoryRegistry;
use heatctl_app::controller::HeatingController;
use heatctl_app::event_bus::InProcessEventBus;

use crate::config::Config;

const EVENT_BUS_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let heating = config
        .heating_config()
        .context("invalid heating configuration")?;

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(EVENT_BUS_CAPACITY));

    // Registry
    let registry = Arc::new(
        InMemoryRegistry::new(Arc::clone(&event_bus)).with_states(config.initial_states()),
    );

    // Controller
    let controller = Arc::new(HeatingController::new(
        Arc::new(heating),
        Arc::clone(&registry),
    ));
    let events = event_bus.subscribe();
    controller
        .start()
        .await
        .context("failed to start heating controller")?;

    let runner = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.run(events).await })
    };

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = driver::drive(stdin, &registry) => {
            result.context("stdin driver failed")?;
            // events still queued are dropped with the runner
            controller.resync().await.context("final resynchronisation failed")?;
        }
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            tracing::info!("interrupted");
        }
    }

    runner.abort();
    tracing::info!("heatctld stopped");
    Ok(())
}
