use serde::{Deserialize, Serialize};

use crate::{
    Error, Meters,
    model::{PathEdge, TransitionKind},
};

/// How edges are weighted during a search
///
/// The defaults route on stored distance alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    /// Extra cost added to every stair edge
    pub stair_penalty_m: Meters,
    /// Extra cost added to every elevator edge
    pub elevator_penalty_m: Meters,
    /// Skip stairs and edges marked inaccessible
    pub avoid_stairs: bool,
}

impl RoutingOptions {
    /// Step-free routing
    pub fn accessible() -> Self {
        Self {
            avoid_stairs: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("stair penalty", self.stair_penalty_m),
            ("elevator penalty", self.elevator_penalty_m),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidData(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Search cost of an edge, `None` when the edge may not be used
    pub(crate) fn edge_cost(&self, edge: &PathEdge) -> Option<f64> {
        if self.avoid_stairs && (edge.transition.stairs || !edge.is_accessible()) {
            return None;
        }
        let penalty = match edge.transition.kind() {
            Some(TransitionKind::Stairs) => self.stair_penalty_m,
            Some(TransitionKind::Elevator) => self.elevator_penalty_m,
            Some(TransitionKind::FloorChange) | None => 0.0,
        };
        Some(edge.distance + penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transition;

    fn edge(stairs: bool, elevator: bool, accessible: Option<bool>) -> PathEdge {
        PathEdge {
            distance: 10.0,
            transition: Transition {
                stairs,
                elevator,
                floor_change: i32::from(stairs || elevator),
            },
            accessible,
        }
    }

    #[test]
    fn default_cost_is_distance() {
        let options = RoutingOptions::default();
        assert_eq!(options.edge_cost(&edge(true, false, None)), Some(10.0));
        assert_eq!(options.edge_cost(&edge(false, true, None)), Some(10.0));
    }

    #[test]
    fn penalties_apply_per_kind() {
        let options = RoutingOptions {
            stair_penalty_m: 15.0,
            elevator_penalty_m: 30.0,
            avoid_stairs: false,
        };
        assert_eq!(options.edge_cost(&edge(true, false, None)), Some(25.0));
        assert_eq!(options.edge_cost(&edge(false, true, None)), Some(40.0));
        assert_eq!(options.edge_cost(&edge(false, false, None)), Some(10.0));
    }

    #[test]
    fn accessible_routing_skips_stairs_and_blocked_paths() {
        let options = RoutingOptions::accessible();
        assert_eq!(options.edge_cost(&edge(true, false, Some(true))), None);
        assert_eq!(options.edge_cost(&edge(false, false, Some(false))), None);
        assert_eq!(options.edge_cost(&edge(false, true, None)), Some(10.0));
    }

    #[test]
    fn negative_penalty_is_rejected() {
        let options = RoutingOptions {
            stair_penalty_m: -1.0,
            ..RoutingOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
