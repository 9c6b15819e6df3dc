use log::debug;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use super::{Route, RoutingOptions, dijkstra::dijkstra_path};
use crate::{
    Error,
    model::{CampusGraph, Position},
};

/// Shortest path between two nodes on stored distances
///
/// # Errors
///
/// `Error::UnknownNode` if either id is not in the graph,
/// `Error::Unreachable` if no path connects them.
pub fn shortest_path(graph: &CampusGraph, start_id: &str, end_id: &str) -> Result<Route, Error> {
    shortest_path_with(graph, start_id, end_id, &RoutingOptions::default())
}

/// [`shortest_path`] with explicit edge weighting
///
/// # Errors
///
/// Same as [`shortest_path`].
pub fn shortest_path_with(
    graph: &CampusGraph,
    start_id: &str,
    end_id: &str,
    options: &RoutingOptions,
) -> Result<Route, Error> {
    let start = graph
        .node_index(start_id)
        .ok_or_else(|| Error::UnknownNode(start_id.to_string()))?;
    let end = graph
        .node_index(end_id)
        .ok_or_else(|| Error::UnknownNode(end_id.to_string()))?;
    route_between(graph, start, end, options)
}

/// Route from a raw position to a destination node
///
/// # Errors
///
/// `Error::InvalidDestination` when the destination is not in the graph
/// (checked before anything else), `Error::NoNodeFound` when the position
/// cannot be anchored and `Error::Unreachable` when no path exists.
pub fn route(graph: &CampusGraph, from: &Position, destination: &str) -> Result<Route, Error> {
    route_with(graph, from, destination, &RoutingOptions::default())
}

/// [`route`] with explicit edge weighting
///
/// # Errors
///
/// Same as [`route`].
pub fn route_with(
    graph: &CampusGraph,
    from: &Position,
    destination: &str,
    options: &RoutingOptions,
) -> Result<Route, Error> {
    let target = destination_index(graph, destination)?;
    let (anchor, _) = graph.anchor(from)?;
    route_between(graph, anchor, target, options)
}

/// Routes from one position to many destinations, computed in parallel
///
/// The outer error covers anchoring; every destination gets its own
/// result, in input order.
///
/// # Errors
///
/// `Error::NoNodeFound` when the position cannot be anchored.
pub fn route_to_many<S>(
    graph: &CampusGraph,
    from: &Position,
    destinations: &[S],
    options: &RoutingOptions,
) -> Result<Vec<Result<Route, Error>>, Error>
where
    S: AsRef<str> + Sync,
{
    let (anchor, _) = graph.anchor(from)?;
    Ok(destinations
        .par_iter()
        .map(|destination| {
            let target = destination_index(graph, destination.as_ref())?;
            route_between(graph, anchor, target, options)
        })
        .collect())
}

pub(crate) fn destination_index(graph: &CampusGraph, destination: &str) -> Result<NodeIndex, Error> {
    graph
        .node_index(destination)
        .ok_or_else(|| Error::InvalidDestination(destination.to_string()))
}

pub(crate) fn route_between(
    graph: &CampusGraph,
    start: NodeIndex,
    end: NodeIndex,
    options: &RoutingOptions,
) -> Result<Route, Error> {
    let node_id = |idx: NodeIndex| {
        graph
            .node(idx)
            .map(|node| node.id.clone())
            .unwrap_or_default()
    };

    let path = dijkstra_path(graph, start, end, options).ok_or_else(|| Error::Unreachable {
        from: node_id(start),
        to: node_id(end),
    })?;
    let route = Route::from_search(graph, &path);
    debug!(
        "Route {} -> {}: {} legs, {:.1} m",
        route.origin(),
        route.destination(),
        route.legs.len(),
        route.total_distance
    );
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{EdgeRecord, NodeRecord, build_graph};
    use crate::model::Category;

    fn line() -> CampusGraph {
        let nodes = [
            NodeRecord::outdoor("A", "A", 0.0, 0.0, Category::Landmark),
            NodeRecord::outdoor("B", "B", 0.0, 0.001, Category::Landmark),
            NodeRecord::outdoor("C", "C", 0.0, 0.002, Category::Library),
            NodeRecord::outdoor("X", "Island", 1.0, 1.0, Category::Building),
        ];
        let edges = [
            EdgeRecord::new("A", "B", 111.0),
            EdgeRecord::new("B", "C", 111.0),
        ];
        build_graph(&nodes, &edges).unwrap()
    }

    #[test]
    fn unknown_ids_are_reported() {
        let graph = line();
        let err = shortest_path(&graph, "A", "Z").unwrap_err();
        assert!(matches!(err, Error::UnknownNode(id) if id == "Z"));
    }

    #[test]
    fn invalid_destination_checked_before_anchoring() {
        let graph = line();
        // Indoor position has no anchor, but the destination error wins
        let err = route(&graph, &Position::indoor(0, 0.0, 0.0), "nowhere").unwrap_err();
        assert!(matches!(err, Error::InvalidDestination(_)));

        let err = route(&graph, &Position::indoor(0, 0.0, 0.0), "C").unwrap_err();
        assert!(matches!(err, Error::NoNodeFound(_)));
    }

    #[test]
    fn route_anchors_on_nearest_node() {
        let graph = line();
        let route = route(&graph, &Position::outdoor(0.0, 0.0009), "C").unwrap();
        assert_eq!(route.node_ids, ["B", "C"]);
    }

    #[test]
    fn unreachable_names_both_ends() {
        let graph = line();
        let err = shortest_path(&graph, "A", "X").unwrap_err();
        assert!(
            matches!(&err, Error::Unreachable { from, to } if from == "A" && to == "X"),
            "got {err:?}"
        );
    }

    #[test]
    fn many_destinations_keep_input_order() {
        let graph = line();
        let results = route_to_many(
            &graph,
            &Position::outdoor(0.0, 0.0),
            &["C", "X", "missing", "A"],
            &RoutingOptions::default(),
        )
        .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().total_distance, 222.0);
        assert!(matches!(results[1], Err(Error::Unreachable { .. })));
        assert!(matches!(results[2], Err(Error::InvalidDestination(_))));
        assert_eq!(results[3].as_ref().unwrap().node_ids, ["A"]);
    }
}
