//! Temperature aggregation across rooms.
//!
//! Each room contributes one [`RoomSample`]. A room without a temperature is
//! left out entirely. A room whose target could not be resolved still counts
//! towards the minimum, so frost protection sees it, but moves neither flag.

use crate::mode::HeatingMode;

/// Target temperature a room should reach.
///
/// In vacation mode the single vacation setpoint wins over the room's own
/// day/night targets.
#[must_use]
pub fn effective_target(
    mode: Option<HeatingMode>,
    vacation: Option<f64>,
    is_day: Option<bool>,
    day: Option<f64>,
    night: Option<f64>,
) -> Option<f64> {
    if mode.is_some_and(HeatingMode::is_vacation) {
        return vacation;
    }
    if is_day? { day } else { night }
}

/// Resolved readings for one room.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoomSample {
    pub temperature: Option<f64>,
    pub target: Option<f64>,
}

impl RoomSample {
    #[must_use]
    pub fn new(temperature: Option<f64>, target: Option<f64>) -> Self {
        Self {
            temperature,
            target,
        }
    }
}

/// System-wide view of the room temperatures against their targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateReading {
    /// Lowest temperature among rooms with a reading.
    pub minimum: Option<f64>,
    /// Some room is strictly below `target - hysteresis`.
    pub some_below: bool,
    /// Every room is at or above its target. Vacuously true.
    pub all_above: bool,
}

impl Default for AggregateReading {
    fn default() -> Self {
        Self {
            minimum: None,
            some_below: false,
            all_above: true,
        }
    }
}

impl AggregateReading {
    /// Fold room samples into an aggregate.
    #[must_use]
    pub fn from_samples(samples: impl IntoIterator<Item = RoomSample>, hysteresis: f64) -> Self {
        samples
            .into_iter()
            .fold(Self::default(), |acc, sample| acc.with(sample, hysteresis))
    }

    #[must_use]
    fn with(self, sample: RoomSample, hysteresis: f64) -> Self {
        let Some(temperature) = sample.temperature else {
            return self;
        };
        let minimum = Some(self.minimum.map_or(temperature, |min| min.min(temperature)));
        let Some(target) = sample.target else {
            return Self { minimum, ..self };
        };
        Self {
            minimum,
            some_below: self.some_below || temperature < target - hysteresis,
            all_above: self.all_above && temperature >= target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temperature: f64, target: f64) -> RoomSample {
        RoomSample::new(Some(temperature), Some(target))
    }

    #[test]
    fn should_be_vacuously_above_when_no_rooms() {
        let agg = AggregateReading::from_samples([], 1.0);
        assert_eq!(agg.minimum, None);
        assert!(agg.all_above);
        assert!(!agg.some_below);
    }

    #[test]
    fn should_report_all_above_when_every_room_reaches_target() {
        let agg = AggregateReading::from_samples([sample(21.0, 21.0), sample(23.5, 20.0)], 1.0);
        assert!(agg.all_above);
        assert!(!agg.some_below);
        assert_eq!(agg.minimum, Some(21.0));
    }

    #[test]
    fn should_not_flag_below_inside_dead_band() {
        let agg = AggregateReading::from_samples([sample(20.2, 21.0)], 1.0);
        assert!(!agg.all_above);
        assert!(!agg.some_below);
    }

    #[test]
    fn should_not_flag_below_at_exact_lower_bound() {
        let agg = AggregateReading::from_samples([sample(20.0, 21.0)], 1.0);
        assert!(!agg.some_below);
        assert!(!agg.all_above);
    }

    #[test]
    fn should_flag_below_when_under_lower_bound() {
        let agg = AggregateReading::from_samples([sample(22.0, 21.0), sample(19.9, 21.0)], 1.0);
        assert!(agg.some_below);
        assert!(!agg.all_above);
        assert_eq!(agg.minimum, Some(19.9));
    }

    #[test]
    fn should_skip_room_with_missing_temperature() {
        let agg = AggregateReading::from_samples(
            [RoomSample::new(None, Some(21.0)), sample(22.0, 21.0)],
            1.0,
        );
        assert_eq!(agg.minimum, Some(22.0));
        assert!(agg.all_above);
    }

    #[test]
    fn should_keep_minimum_but_not_flags_for_room_with_missing_target() {
        let agg = AggregateReading::from_samples(
            [RoomSample::new(Some(5.0), None), sample(22.0, 21.0)],
            1.0,
        );
        assert_eq!(agg.minimum, Some(5.0));
        assert!(!agg.some_below);
        assert!(agg.all_above);
    }

    #[test]
    fn should_use_vacation_target_in_vacation_mode() {
        let target = effective_target(
            Some(HeatingMode::Vacation),
            Some(16.0),
            Some(true),
            Some(21.0),
            Some(18.0),
        );
        assert_eq!(target, Some(16.0));
    }

    #[test]
    fn should_pick_day_or_night_target_outside_vacation() {
        let day = effective_target(Some(HeatingMode::Eco), Some(16.0), Some(true), Some(21.0), Some(18.0));
        let night = effective_target(Some(HeatingMode::Eco), Some(16.0), Some(false), Some(21.0), Some(18.0));
        assert_eq!(day, Some(21.0));
        assert_eq!(night, Some(18.0));
    }

    #[test]
    fn should_not_resolve_target_when_day_night_flag_missing() {
        let target = effective_target(Some(HeatingMode::Auto), None, None, Some(21.0), Some(18.0));
        assert_eq!(target, None);
    }
}
