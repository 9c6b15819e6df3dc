use chrono::{DateTime, Utc};
use log::trace;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use super::{GpsQuality, Instruction, PositionSample};
use crate::{
    Degrees, Error, Meters,
    config::{NavigationConfig, RecomputePolicy},
    geodesy::{Cardinal, cardinal, relative_bearing},
    model::CampusGraph,
    routing::Route,
};

/// Where a sample stands relative to the active route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// Node the sample snapped to
    pub anchor: String,
    /// Whether the anchor lies on the route
    pub on_route: bool,
    /// Distance from the sample to the anchor node
    pub anchor_distance_m: Meters,
    pub leg_index: usize,
    /// Node at the end of the current leg
    pub waypoint: String,
    /// `None` when the waypoint is on another floor or coordinate system
    pub distance_to_waypoint: Option<Meters>,
    pub distance_to_destination: Meters,
    /// Remaining walking distance along the route
    pub distance_remaining: Meters,
    /// Bearing toward the waypoint
    pub bearing: Option<Degrees>,
    pub cardinal: Option<Cardinal>,
    /// Bearing relative to the device heading, positive to the right
    pub relative_bearing: Option<Degrees>,
    pub heading: Option<Degrees>,
    pub instruction: Instruction,
    pub gps_quality: GpsQuality,
    pub arrived: bool,
}

/// Whether a sample arrives too soon after the last accepted one
///
/// Samples with a timestamp earlier than the last accepted sample are
/// rejected as well.
pub fn is_debounced(
    last_accepted: Option<DateTime<Utc>>,
    sample: &PositionSample,
    config: &NavigationConfig,
) -> bool {
    let Some(last) = last_accepted else {
        return false;
    };
    let min_gap = i64::try_from(config.min_update_interval_ms).unwrap_or(i64::MAX);
    sample.millis_since(last) < min_gap
}

/// Whether the route has to be recomputed for a sample anchored at `anchor`
pub(crate) fn needs_reroute(
    graph: &CampusGraph,
    route: &Route,
    anchor: NodeIndex,
    policy: RecomputePolicy,
) -> bool {
    if route.generation != graph.generation() {
        return true;
    }
    match policy {
        RecomputePolicy::EverySample => true,
        RecomputePolicy::AnchorChange => route.position_of(anchor).is_none(),
    }
}

/// Measures a sample against a route
///
/// Anchors the sample on the graph and reports progress from the anchor.
/// Callers should recompute the route when `on_route` is false.
///
/// # Errors
///
/// `Error::NoNodeFound` when the sample cannot be anchored.
pub fn track(
    graph: &CampusGraph,
    route: &Route,
    sample: &PositionSample,
    heading: Option<Degrees>,
    config: &NavigationConfig,
) -> Result<Progress, Error> {
    let (anchor, anchor_distance) = graph.anchor(&sample.position)?;
    Ok(measure(
        graph,
        route,
        anchor,
        anchor_distance,
        sample,
        heading,
        config,
    ))
}

/// Progress of a sample anchored on a node of `route`
///
/// An anchor not on the route is treated as the route's first node.
pub(crate) fn measure(
    graph: &CampusGraph,
    route: &Route,
    anchor: NodeIndex,
    anchor_distance: Meters,
    sample: &PositionSample,
    heading: Option<Degrees>,
    config: &NavigationConfig,
) -> Progress {
    let last_node = route.node_ids.len().saturating_sub(1);
    let on_route = route.position_of(anchor);
    let leg_index = on_route
        .unwrap_or(0)
        .min(route.legs.len().saturating_sub(1));
    let waypoint_index = (leg_index + 1).min(last_node);

    let position_of = |index: usize| {
        route
            .node_index(index)
            .and_then(|idx| graph.node(idx))
            .map(|node| &node.position)
    };
    let waypoint = position_of(waypoint_index);
    let destination = position_of(last_node);

    let distance_to_waypoint = waypoint.and_then(|p| sample.position.distance_to(p));
    let distance_remaining = match distance_to_waypoint {
        Some(to_waypoint) => to_waypoint + route.distance_from_leg(waypoint_index),
        None => route.distance_from_leg(leg_index),
    };
    let distance_to_destination = destination
        .and_then(|p| sample.position.distance_to(p))
        .unwrap_or(distance_remaining);

    let bearing = waypoint.and_then(|p| sample.position.bearing_to(p));
    let destination_bearing = destination.and_then(|p| sample.position.bearing_to(p));
    let current_leg = route.legs.get(leg_index);

    let arrived = distance_to_destination < config.arrival_radius_m;
    let instruction = if arrived {
        Instruction::Arrived
    } else if distance_to_destination < config.final_approach_radius_m {
        Instruction::FinalApproach {
            direction: destination_bearing.or(bearing).map(cardinal),
            distance_m: distance_to_destination,
        }
    } else if let Some(leg) = current_leg
        && let Some(kind) = leg.transition.kind()
    {
        Instruction::Transition {
            kind,
            floor_change: leg.transition.floor_change,
        }
    } else {
        Instruction::Head {
            direction: bearing.map(cardinal),
            distance_m: distance_to_waypoint
                .or(current_leg.map(|leg| leg.distance))
                .unwrap_or(distance_remaining),
        }
    };

    let progress = Progress {
        anchor: graph
            .node(anchor)
            .map(|node| node.id.clone())
            .unwrap_or_default(),
        on_route: on_route.is_some(),
        anchor_distance_m: anchor_distance,
        leg_index,
        waypoint: route
            .node_ids
            .get(waypoint_index)
            .cloned()
            .unwrap_or_default(),
        distance_to_waypoint,
        distance_to_destination,
        distance_remaining,
        bearing,
        cardinal: bearing.map(cardinal),
        relative_bearing: heading.zip(bearing).map(|(h, b)| relative_bearing(h, b)),
        heading,
        instruction,
        gps_quality: GpsQuality::from_accuracy(sample.accuracy_m),
        arrived,
    };
    trace!(
        "leg {} -> {}: {:.1} m to go, {}",
        progress.leg_index,
        progress.waypoint,
        progress.distance_to_destination,
        progress.instruction
    );
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{EdgeRecord, NodeRecord, build_graph};
    use crate::model::{Category, Position};
    use crate::routing::shortest_path;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn abc() -> CampusGraph {
        let nodes = [
            NodeRecord::outdoor("A", "A", 0.0, 0.0, Category::Landmark),
            NodeRecord::outdoor("B", "B", 0.0, 0.001, Category::Landmark),
            NodeRecord::outdoor("C", "C", 0.0, 0.002, Category::Library),
        ];
        let edges = [
            EdgeRecord::new("A", "B", 111.0),
            EdgeRecord::new("B", "C", 111.0),
        ];
        build_graph(&nodes, &edges).unwrap()
    }

    fn sample(lat: f64, lng: f64, accuracy: f64) -> PositionSample {
        PositionSample::new(Position::outdoor(lat, lng), accuracy, at(0))
    }

    #[test]
    fn long_range_at_start() {
        let graph = abc();
        let route = shortest_path(&graph, "A", "C").unwrap();
        let config = NavigationConfig::default();
        let progress = track(&graph, &route, &sample(0.0, 0.0, 3.0), None, &config).unwrap();

        assert_eq!(progress.gps_quality, GpsQuality::Excellent);
        assert_eq!(progress.leg_index, 0);
        assert_eq!(progress.waypoint, "B");
        assert!((progress.distance_to_destination - 222.4).abs() < 0.5);
        assert!(matches!(
            progress.instruction,
            Instruction::Head {
                direction: Some(Cardinal::E),
                ..
            }
        ));
        assert!(!progress.arrived);
    }

    #[test]
    fn anchor_advances_leg() {
        let graph = abc();
        let route = shortest_path(&graph, "A", "C").unwrap();
        let config = NavigationConfig::default();
        let progress = track(&graph, &route, &sample(0.0, 0.00095, 5.0), None, &config).unwrap();
        assert_eq!(progress.anchor, "B");
        assert_eq!(progress.leg_index, 1);
        assert_eq!(progress.waypoint, "C");
        assert!((progress.distance_remaining - progress.distance_to_destination).abs() < 0.01);
    }

    #[test]
    fn final_approach_then_arrival() {
        let graph = abc();
        let route = shortest_path(&graph, "A", "C").unwrap();
        let config = NavigationConfig::default();

        // ~33 m west of C
        let near = track(&graph, &route, &sample(0.0, 0.0017, 5.0), None, &config).unwrap();
        assert_eq!(near.instruction.category(), "final_approach");
        assert!(!near.arrived);

        // ~8 m west of C
        let there = track(&graph, &route, &sample(0.0, 0.00193, 5.0), None, &config).unwrap();
        assert!(there.arrived);
        assert_eq!(there.instruction, Instruction::Arrived);
    }

    #[test]
    fn relative_bearing_uses_heading() {
        let graph = abc();
        let route = shortest_path(&graph, "A", "C").unwrap();
        let config = NavigationConfig::default();
        let progress = track(&graph, &route, &sample(0.0, 0.0, 3.0), Some(0.0), &config).unwrap();
        let relative = progress.relative_bearing.unwrap();
        assert!((relative - 90.0).abs() < 1e-6, "got {relative}");
    }

    #[test]
    fn floor_change_leg_gives_transition_instruction() {
        let nodes = [
            NodeRecord::indoor("hall", "Hall", 0, 0.0, 0.0, Category::Other),
            NodeRecord::indoor("up", "Landing", 2, 0.0, 0.0, Category::Stair),
            NodeRecord::indoor("room", "Room", 2, 80.0, 0.0, Category::Room),
        ];
        let edges = [
            EdgeRecord::elevator("hall", "up", 4.0, 2),
            EdgeRecord::new("up", "room", 80.0),
        ];
        let graph = build_graph(&nodes, &edges).unwrap();
        let route = shortest_path(&graph, "hall", "room").unwrap();
        let config = NavigationConfig::default();

        let at_hall = PositionSample::new(Position::indoor(0, 1.0, 0.0), 4.0, at(0));
        let progress = track(&graph, &route, &at_hall, None, &config).unwrap();
        assert_eq!(progress.instruction.to_string(), "Take the elevator up 2 floors");
        // Destination is on another floor, so distance follows the route
        assert_eq!(progress.distance_to_destination, 84.0);
        assert_eq!(progress.distance_to_waypoint, None);
        assert_eq!(progress.bearing, None);
    }

    #[test]
    fn off_route_anchor_is_reported() {
        let graph = abc();
        let route = shortest_path(&graph, "B", "C").unwrap();
        let config = NavigationConfig::default();
        let progress = track(&graph, &route, &sample(0.0, 0.0, 3.0), None, &config).unwrap();
        assert_eq!(progress.anchor, "A");
        assert!(!progress.on_route);
        assert_eq!(progress.leg_index, 0);
        assert!(needs_reroute(
            &graph,
            &route,
            graph.node_index("A").unwrap(),
            RecomputePolicy::AnchorChange
        ));
        assert!(!needs_reroute(
            &graph,
            &route,
            graph.node_index("C").unwrap(),
            RecomputePolicy::AnchorChange
        ));
        assert!(needs_reroute(
            &graph,
            &route,
            graph.node_index("C").unwrap(),
            RecomputePolicy::EverySample
        ));
    }

    #[test]
    fn debounce_window() {
        let config = NavigationConfig::default();
        let s = |ms| PositionSample::new(Position::outdoor(0.0, 0.0), 3.0, at(ms));
        assert!(!is_debounced(None, &s(0), &config));
        assert!(is_debounced(Some(at(0)), &s(999), &config));
        assert!(!is_debounced(Some(at(0)), &s(1000), &config));
        assert!(is_debounced(Some(at(5000)), &s(4000), &config));
    }
}
