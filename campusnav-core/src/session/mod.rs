//! Navigation session state machine
//!
//! `Idle → DestinationSelected → Navigating → Arrived → Idle`. A session owns
//! the current route and the tracking state for one visitor and publishes
//! immutable snapshots after every change.

mod events;
mod navigation;
mod reroute;
mod snapshot;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

pub use events::SessionEvent;
pub use navigation::NavigationSession;
pub use reroute::{PositionUpdate, RerouteJob, RerouteOutcome};
pub use snapshot::{SessionError, SessionSnapshot};

use crate::{CampusGraph, Error, NavigationConfig, PositionSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    #[default]
    Idle,
    DestinationSelected,
    Navigating,
    Arrived,
}

impl NavState {
    pub fn as_str(self) -> &'static str {
        match self {
            NavState::Idle => "idle",
            NavState::DestinationSelected => "destination selected",
            NavState::Navigating => "navigating",
            NavState::Arrived => "arrived",
        }
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects `destination`, applies the initial fix and starts navigating
///
/// # Errors
///
/// `Error::InvalidData` for an inconsistent configuration,
/// `Error::InvalidDestination` when the destination is not in the graph and
/// any routing error of the initial route computation.
pub fn start_session(
    graph: Arc<CampusGraph>,
    destination: &str,
    initial: PositionSample,
    config: NavigationConfig,
) -> Result<NavigationSession, Error> {
    config.validate()?;
    let mut session = NavigationSession::new(graph, config);
    session.select_destination(destination)?;
    session.submit_position(initial);
    session.start()?;
    Ok(session)
}
