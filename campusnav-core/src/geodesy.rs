//! Great-circle and floor-plan geometry
//!
//! Outdoor coordinates are `geo::Point`s with `x = longitude` and
//! `y = latitude`, in degrees. Floor-plan coordinates are plain meters with
//! `+y` pointing north.

use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{Degrees, EARTH_RADIUS_M, Meters};

/// Haversine distance between two points in meters.
pub fn distance_meters(a: &Point<f64>, b: &Point<f64>) -> Meters {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = (b.y() - a.y()).to_radians();
    let dlng = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push h slightly past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    EARTH_RADIUS_M * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `a` to `b` in degrees [0, 360).
///
/// Returns 0 when both points coincide.
pub fn bearing_degrees(a: &Point<f64>, b: &Point<f64>) -> Degrees {
    if a == b {
        return 0.0;
    }

    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlng = (b.x() - a.x()).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Euclidean distance on a floor plan.
pub fn planar_distance(ax: f64, ay: f64, bx: f64, by: f64) -> Meters {
    (bx - ax).hypot(by - ay)
}

/// Bearing on a floor plan, clockwise from `+y`.
pub fn planar_bearing(ax: f64, ay: f64, bx: f64, by: f64) -> Degrees {
    let (dx, dy) = (bx - ax, by - ay);
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    (dx.atan2(dy).to_degrees() + 360.0) % 360.0
}

/// Signed difference `to - from` folded into (-180, 180].
pub fn relative_bearing(from: Degrees, to: Degrees) -> Degrees {
    let diff = (to - from).rem_euclid(360.0);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// Eight-point compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

const CARDINALS: [Cardinal; 8] = [
    Cardinal::N,
    Cardinal::NE,
    Cardinal::E,
    Cardinal::SE,
    Cardinal::S,
    Cardinal::SW,
    Cardinal::W,
    Cardinal::NW,
];

impl Cardinal {
    pub fn short(self) -> &'static str {
        match self {
            Cardinal::N => "N",
            Cardinal::NE => "NE",
            Cardinal::E => "E",
            Cardinal::SE => "SE",
            Cardinal::S => "S",
            Cardinal::SW => "SW",
            Cardinal::W => "W",
            Cardinal::NW => "NW",
        }
    }

    pub fn long(self) -> &'static str {
        match self {
            Cardinal::N => "North",
            Cardinal::NE => "North-East",
            Cardinal::E => "East",
            Cardinal::SE => "South-East",
            Cardinal::S => "South",
            Cardinal::SW => "South-West",
            Cardinal::W => "West",
            Cardinal::NW => "North-West",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// Maps a bearing onto the nearest of eight compass labels.
///
/// Boundaries at 22.5° + k·45° round half up (22.5° is `NE`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cardinal(bearing: Degrees) -> Cardinal {
    let sector = (bearing.rem_euclid(360.0) / 45.0).round() as usize;
    CARDINALS[sector % 8]
}

/// Walking distance as shown to the visitor
#[allow(clippy::cast_possible_truncation)]
pub fn format_distance(meters: Meters) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round() as i64)
    }
}
