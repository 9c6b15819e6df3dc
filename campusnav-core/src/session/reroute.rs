use std::sync::Arc;

use petgraph::graph::NodeIndex;

use super::SessionSnapshot;
use crate::{
    Degrees, Error, Meters,
    model::CampusGraph,
    routing::{Route, RoutingOptions, destination_index, route_between},
    tracking::PositionSample,
};

/// Result of handing a sample to a navigating session
#[derive(Debug)]
pub enum PositionUpdate {
    /// The sample was applied (or ignored) and this is the new snapshot
    Applied(Arc<SessionSnapshot>),
    /// The route must be recomputed first; run the job anywhere and pass
    /// its outcome to `finish_reroute`
    Reroute(RerouteJob),
}

/// Route recomputation detached from the session
///
/// Owns everything it needs, so it can run on another thread while the
/// session keeps serving snapshots.
#[derive(Debug, Clone)]
pub struct RerouteJob {
    pub(crate) epoch: u64,
    pub(crate) graph: Arc<CampusGraph>,
    pub(crate) anchor: NodeIndex,
    pub(crate) anchor_distance: Meters,
    pub(crate) destination: String,
    pub(crate) options: RoutingOptions,
    pub(crate) sample: PositionSample,
    pub(crate) heading: Option<Degrees>,
}

impl RerouteJob {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn run(self) -> RerouteOutcome {
        let result = destination_index(&self.graph, &self.destination)
            .and_then(|target| route_between(&self.graph, self.anchor, target, &self.options));
        RerouteOutcome {
            epoch: self.epoch,
            generation: self.graph.generation(),
            anchor: self.anchor,
            anchor_distance: self.anchor_distance,
            sample: self.sample,
            heading: self.heading,
            result,
        }
    }
}

/// Finished [`RerouteJob`]
#[derive(Debug)]
pub struct RerouteOutcome {
    pub(crate) epoch: u64,
    pub(crate) generation: u64,
    pub(crate) anchor: NodeIndex,
    pub(crate) anchor_distance: Meters,
    pub(crate) sample: PositionSample,
    pub(crate) heading: Option<Degrees>,
    pub(crate) result: Result<Route, Error>,
}

impl RerouteOutcome {
    pub fn route(&self) -> Option<&Route> {
        self.result.as_ref().ok()
    }
}
