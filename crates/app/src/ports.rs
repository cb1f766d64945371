//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the controller and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod event_bus;
pub mod registry;

pub use event_bus::EventPublisher;
pub use registry::StateRegistry;
