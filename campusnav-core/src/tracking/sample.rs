use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Degrees, Meters, model::Position};

/// One fix from a position source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub position: Position,
    /// Accuracy radius in meters
    pub accuracy_m: Meters,
    /// Course over ground reported by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<Degrees>,
    /// Meters per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionSample {
    pub fn new(position: Position, accuracy_m: Meters, timestamp: DateTime<Utc>) -> Self {
        Self {
            position,
            accuracy_m,
            heading: None,
            speed: None,
            timestamp,
        }
    }

    #[must_use]
    pub fn with_heading(mut self, heading: Degrees) -> Self {
        self.heading = Some(heading);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Milliseconds from `earlier` to this sample, negative when out of order
    pub fn millis_since(&self, earlier: DateTime<Utc>) -> i64 {
        (self.timestamp - earlier).num_milliseconds()
    }
}

/// Compass reading from an orientation sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingReading {
    /// Degrees clockwise from north
    pub degrees: Degrees,
    pub timestamp: DateTime<Utc>,
}

impl HeadingReading {
    pub fn new(degrees: Degrees, timestamp: DateTime<Utc>) -> Self {
        Self { degrees, timestamp }
    }
}
