use std::sync::Arc;

use serde::Serialize;

use crate::{Meters, routing::Route};

/// Notification emitted by a session, drained with
/// [`NavigationSession::take_events`](super::NavigationSession::take_events)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    DestinationSelected {
        destination: String,
    },
    NavigationStarted {
        route: Arc<Route>,
    },
    RouteChanged {
        route: Arc<Route>,
    },
    Progress {
        leg_index: usize,
        distance_to_destination: Meters,
    },
    /// Entered the final-approach radius
    FinalApproach {
        distance_to_destination: Meters,
    },
    Arrived {
        destination: String,
    },
    /// Arrival grace period over or arrival acknowledged
    Finished,
    /// Navigation cancelled before arrival
    Stopped,
    LocationTimeout,
    GraphReplaced {
        generation: u64,
    },
}
