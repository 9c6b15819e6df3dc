//! Tunables for the tracking loop and the navigation session

use serde::{Deserialize, Serialize};

use crate::{Error, Meters, routing::RoutingOptions};

/// When the tracking loop re-runs the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputePolicy {
    /// Recompute on every accepted position sample.
    EverySample,
    /// Recompute only when the anchored node leaves the current route
    /// or the graph was replaced. Moving along the route only advances
    /// the current leg.
    #[default]
    AnchorChange,
}

/// Navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Distance to the destination under which the visitor has arrived
    pub arrival_radius_m: Meters,
    /// Distance under which the final-approach instruction is emitted
    pub final_approach_radius_m: Meters,
    /// Samples closer together than this are ignored
    pub min_update_interval_ms: u64,
    /// Time the arrived state is held before the session resets
    pub arrival_grace_ms: u64,
    /// Time without a position fix before a location timeout is reported
    pub location_timeout_ms: u64,
    pub recompute: RecomputePolicy,
    /// Sensor headings older than this fall back to movement bearing
    pub heading_max_age_ms: u64,
    /// Minimum displacement for a movement-derived heading
    pub movement_heading_min_m: Meters,
    pub routing: RoutingOptions,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            arrival_radius_m: 10.0,
            final_approach_radius_m: 50.0,
            min_update_interval_ms: 1000,
            arrival_grace_ms: 3000,
            location_timeout_ms: 15_000,
            recompute: RecomputePolicy::AnchorChange,
            heading_max_age_ms: 2000,
            movement_heading_min_m: 3.0,
            routing: RoutingOptions::default(),
        }
    }
}

impl NavigationConfig {
    /// Checks radii and penalties for consistency
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidData` when a radius or penalty is negative or
    /// the final-approach radius is smaller than the arrival radius.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.arrival_radius_m.is_finite() && self.arrival_radius_m >= 0.0) {
            return Err(Error::InvalidData(format!(
                "arrival radius must be a non-negative number, got {}",
                self.arrival_radius_m
            )));
        }
        if !(self.final_approach_radius_m >= self.arrival_radius_m) {
            return Err(Error::InvalidData(format!(
                "final approach radius ({}) must not be smaller than arrival radius ({})",
                self.final_approach_radius_m, self.arrival_radius_m
            )));
        }
        if !(self.movement_heading_min_m >= 0.0) {
            return Err(Error::InvalidData(
                "movement heading threshold must be non-negative".to_string(),
            ));
        }
        self.routing.validate()
    }
}
