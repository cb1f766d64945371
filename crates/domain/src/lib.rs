//! # heatctl-domain
//!
//! Pure domain model for the heatctl heating controller.
//!
//! ## Responsibilities
//! - Foundational types: external identifiers, raw registry states, error conventions, timestamps
//! - Define the **configuration model** (rooms, global entities, tunables) and its invariants
//! - Define **modes** (heating policy and the hvac mode displayed on thermostats)
//! - Aggregate room readings into thresholds (minimum, some-below, all-above)
//! - Decide the boiler state from mode, occupancy, aggregate and hysteresis
//! - Define **Events** (state-change notifications coming from the registry)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod aggregate;
pub mod config;
pub mod decision;
pub mod event;
pub mod mode;
pub mod state;
pub mod thermostat;
