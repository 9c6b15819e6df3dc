use serde::Serialize;

use super::{HeadingReading, PositionSample};
use crate::{Degrees, config::NavigationConfig};

/// Where the current heading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingOrigin {
    Sensor,
    Sample,
    Movement,
    Previous,
}

/// Resolves the device heading for each accepted sample
///
/// Fallback order: a fresh orientation-sensor reading, the heading carried
/// by the sample, the bearing of movement since the previous sample, and
/// finally the last heading resolved.
#[derive(Debug, Clone, Default)]
pub struct HeadingTracker {
    sensor: Option<HeadingReading>,
    last: Option<(Degrees, HeadingOrigin)>,
}

impl HeadingTracker {
    /// Records an orientation sensor reading; non-finite readings are dropped
    pub fn update_sensor(&mut self, reading: HeadingReading) {
        if reading.degrees.is_finite() {
            let degrees = reading.degrees.rem_euclid(360.0);
            self.sensor = Some(HeadingReading { degrees, ..reading });
            self.last = Some((degrees, HeadingOrigin::Sensor));
        }
    }

    pub fn current(&self) -> Option<(Degrees, HeadingOrigin)> {
        self.last
    }

    pub fn resolve(
        &mut self,
        sample: &PositionSample,
        previous: Option<&PositionSample>,
        config: &NavigationConfig,
    ) -> Option<Degrees> {
        let max_age = i64::try_from(config.heading_max_age_ms).unwrap_or(i64::MAX);

        let from_sensor = self
            .sensor
            .filter(|reading| sample.millis_since(reading.timestamp) <= max_age)
            .map(|reading| (reading.degrees, HeadingOrigin::Sensor));

        let from_sample = || {
            sample
                .heading
                .filter(|h| h.is_finite())
                .map(|h| (h.rem_euclid(360.0), HeadingOrigin::Sample))
        };

        let from_movement = || {
            let previous = previous?;
            let moved = previous.position.distance_to(&sample.position)?;
            if moved > 0.0 && moved >= config.movement_heading_min_m {
                previous
                    .position
                    .bearing_to(&sample.position)
                    .map(|b| (b, HeadingOrigin::Movement))
            } else {
                None
            }
        };

        let resolved = from_sensor
            .or_else(from_sample)
            .or_else(from_movement)
            .or_else(|| self.last.map(|(h, _)| (h, HeadingOrigin::Previous)));

        self.last = resolved;
        resolved.map(|(heading, _)| heading)
    }
}
