//! Boiler on/off decision.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. minimum temperature below the frost threshold → on (any mode)
//! 2. mode `on` → on
//! 3. mode `off` → off
//! 4. mode `auto` while somebody is home → on
//! 5. otherwise the hysteresis dead-band:
//!    - forced (occupancy changed): home → on unless all rooms reached their
//!      target; away → off unless some room fell below the band
//!    - routine: heating → off once all rooms reached their target; idle → on
//!      once some room fell below the band

use crate::aggregate::AggregateReading;
use crate::config::Tunables;
use crate::mode::HeatingMode;

/// Everything the decision depends on, read fresh for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput {
    pub mode: HeatingMode,
    pub aggregate: AggregateReading,
    pub is_home: bool,
    pub is_heating: bool,
    pub force: bool,
}

/// Outcome of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatingDecision {
    On,
    Off,
    Unchanged,
}

impl HeatingDecision {
    /// The switch command to issue, if the decided state differs from the
    /// observed one.
    #[must_use]
    pub fn switch_command(self, is_heating: bool) -> Option<bool> {
        match self {
            Self::On if !is_heating => Some(true),
            Self::Off if is_heating => Some(false),
            _ => None,
        }
    }
}

/// Decide the boiler state.
#[must_use]
pub fn decide_heating(input: &DecisionInput, tunables: &Tunables) -> HeatingDecision {
    let DecisionInput {
        mode,
        aggregate,
        is_home,
        is_heating,
        force,
    } = *input;

    if aggregate
        .minimum
        .is_some_and(|min| min < tunables.min_temperature)
    {
        return HeatingDecision::On;
    }
    match mode {
        HeatingMode::On => return HeatingDecision::On,
        HeatingMode::Off => return HeatingDecision::Off,
        HeatingMode::Auto if is_home => return HeatingDecision::On,
        HeatingMode::Auto | HeatingMode::Eco | HeatingMode::Vacation => {}
    }

    if force {
        if is_home && !aggregate.all_above {
            return HeatingDecision::On;
        }
        if !is_home && !aggregate.some_below {
            return HeatingDecision::Off;
        }
        return HeatingDecision::Unchanged;
    }

    if is_heating && aggregate.all_above {
        HeatingDecision::Off
    } else if !is_heating && aggregate.some_below {
        HeatingDecision::On
    } else {
        HeatingDecision::Unchanged
    }
}
