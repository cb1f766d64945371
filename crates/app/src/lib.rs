//! # heatctl-app
//!
//! Application layer — the heating controller and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `StateRegistry` — read entity states, command the boiler switch and thermostats
//!   - `EventPublisher` — publish state-change events to subscribers
//! - Provide the `HeatingController`:
//!   - heating cycle (read → aggregate → decide → actuate)
//!   - thermostat synchronisation for all rooms or a scoped subset
//!   - event routing from state changes to the minimal re-evaluation
//!   - serial run loop over the event bus
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `heatctl-domain` only (plus `tokio::sync` for channels and locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod event_bus;
pub mod event_router;
pub mod ports;
pub mod thermostat_sync;

#[cfg(test)]
pub(crate) mod testing;
