use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Meters;

/// Coarse classification of a fix's accuracy radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsQuality {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl GpsQuality {
    /// Tier for an accuracy radius in meters
    ///
    /// Unknown (NaN or negative) accuracy counts as poor.
    pub fn from_accuracy(accuracy_m: Meters) -> Self {
        match accuracy_m {
            a if !(a >= 0.0) => GpsQuality::Poor,
            a if a < 5.0 => GpsQuality::Excellent,
            a if a < 10.0 => GpsQuality::Good,
            a if a < 20.0 => GpsQuality::Moderate,
            _ => GpsQuality::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GpsQuality::Excellent => "excellent",
            GpsQuality::Good => "good",
            GpsQuality::Moderate => "moderate",
            GpsQuality::Poor => "poor",
        }
    }
}

impl fmt::Display for GpsQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
