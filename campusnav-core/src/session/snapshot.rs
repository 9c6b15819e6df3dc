use std::sync::Arc;

use serde::Serialize;

use super::NavState;
use crate::{
    Degrees, Error, Meters,
    geodesy::Cardinal,
    routing::Route,
    tracking::{GpsQuality, HeadingOrigin, Instruction},
};

/// Error as surfaced to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionError {
    pub kind: String,
    pub message: String,
}

impl From<&Error> for SessionError {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Immutable view of a session after one update
///
/// Published behind an `Arc`, so readers never see a half-applied change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Incremented on every published change
    pub version: u64,
    pub state: NavState,
    pub destination: Option<String>,
    pub route: Option<Arc<Route>>,
    pub leg_index: usize,
    pub anchor: Option<String>,
    pub distance_to_waypoint: Option<Meters>,
    pub distance_to_destination: Option<Meters>,
    pub distance_remaining: Option<Meters>,
    pub bearing: Option<Degrees>,
    pub cardinal: Option<Cardinal>,
    pub relative_bearing: Option<Degrees>,
    pub heading: Option<Degrees>,
    /// Which input the heading was taken from
    pub heading_source: Option<HeadingOrigin>,
    pub instruction: Option<Instruction>,
    pub instruction_text: Option<String>,
    pub gps_quality: Option<GpsQuality>,
    pub arrived: bool,
    pub error: Option<SessionError>,
}

impl SessionSnapshot {
    pub(crate) fn idle() -> Self {
        Self {
            version: 0,
            state: NavState::Idle,
            destination: None,
            route: None,
            leg_index: 0,
            anchor: None,
            distance_to_waypoint: None,
            distance_to_destination: None,
            distance_remaining: None,
            bearing: None,
            cardinal: None,
            relative_bearing: None,
            heading: None,
            heading_source: None,
            instruction: None,
            instruction_text: None,
            gps_quality: None,
            arrived: false,
            error: None,
        }
    }

    /// Node ids of the active route, empty when there is none
    pub fn route_node_ids(&self) -> &[String] {
        self.route
            .as_deref()
            .map(|route| route.node_ids.as_slice())
            .unwrap_or_default()
    }

    pub fn error_kind(&self) -> Option<&str> {
        self.error.as_ref().map(|err| err.kind.as_str())
    }
}
