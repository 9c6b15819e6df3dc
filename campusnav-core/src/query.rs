//! Lookups over a campus graph: nearby nodes, categories and the
//! destination catalogue

use std::cmp::Ordering;

use serde::Serialize;

use crate::{
    Error, Meters,
    model::{CampusGraph, Category, Node, Position},
    routing::{RoutingOptions, route_to_many},
};

/// Serializable view of a node for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub icon: String,
    pub position: Position,
    pub is_destination: bool,
    /// Straight-line or walking distance, depending on the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<Meters>,
}

impl NodeSummary {
    pub fn new(node: &Node, distance_m: Option<Meters>) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            category: node.category,
            icon: node.icon().to_string(),
            position: node.position.clone(),
            is_destination: node.is_destination(),
            distance_m,
        }
    }
}

impl CampusGraph {
    /// Nodes within `radius` meters of a position, closest first
    ///
    /// Only nodes in the same coordinate system are considered: outdoor
    /// positions see outdoor nodes, indoor positions see their floor.
    pub fn nodes_near(&self, position: &Position, radius: Meters) -> Vec<(&Node, Meters)> {
        self.within(position, radius)
            .into_iter()
            .filter_map(|(idx, distance)| self.node(idx).map(|node| (node, distance)))
            .collect()
    }

    /// Nodes within `radius` meters of node `id`, excluding the node itself
    ///
    /// # Errors
    ///
    /// `Error::UnknownNode` when `id` is not in the graph.
    pub fn nodes_within(&self, id: &str, radius: Meters) -> Result<Vec<(&Node, Meters)>, Error> {
        let center = self
            .node_by_id(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))?;
        Ok(self
            .nodes_near(&center.position, radius)
            .into_iter()
            .filter(|(node, _)| node.id != id)
            .collect())
    }

    pub fn nodes_by_category(&self, category: Category) -> impl Iterator<Item = &Node> {
        self.nodes().filter(move |node| node.category == category)
    }

    /// Nodes offered as navigation targets, in insertion order
    pub fn destinations(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|node| node.is_destination())
    }
}

/// Destination catalogue with walking distances from a position
///
/// Reachable destinations come first, nearest first; unreachable ones
/// follow without a distance, sorted by name.
///
/// # Errors
///
/// `Error::NoNodeFound` when the position cannot be anchored.
pub fn destinations_from(
    graph: &CampusGraph,
    from: &Position,
    options: &RoutingOptions,
) -> Result<Vec<NodeSummary>, Error> {
    let targets: Vec<&Node> = graph.destinations().collect();
    let ids: Vec<&str> = targets.iter().map(|node| node.id.as_str()).collect();
    let routes = route_to_many(graph, from, &ids, options)?;

    let mut summaries: Vec<NodeSummary> = targets
        .into_iter()
        .zip(routes)
        .map(|(node, route)| {
            NodeSummary::new(node, route.ok().map(|route| route.total_distance))
        })
        .collect();

    summaries.sort_by(|a, b| match (a.distance_m, b.distance_m) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{EdgeRecord, NodeRecord, build_graph};

    fn campus() -> CampusGraph {
        let nodes = [
            NodeRecord::outdoor("gate", "Main Gate", 0.0, 0.0, Category::MainGate),
            NodeRecord::outdoor("path", "Path", 0.0, 0.0005, Category::Other),
            NodeRecord::outdoor("lib", "Library", 0.0, 0.001, Category::Library),
            NodeRecord::outdoor("gym", "Gym", 0.0, 0.003, Category::Gym),
            NodeRecord::outdoor("pond", "Pond", 0.0012, 0.0, Category::Garden),
            NodeRecord::outdoor("cafe", "Cafe", 0.01, 0.01, Category::Cafeteria),
            NodeRecord::indoor("room", "Room", 1, 0.0, 0.0, Category::Room),
            NodeRecord::indoor("lab", "Lab", 1, 3.0, 4.0, Category::Lab),
        ];
        let edges = [
            EdgeRecord::new("gate", "path", 55.0),
            EdgeRecord::new("path", "lib", 55.0),
            EdgeRecord::new("lib", "gym", 222.0),
            EdgeRecord::new("gate", "pond", 133.0),
            EdgeRecord::new("room", "lab", 5.0),
        ];
        build_graph(&nodes, &edges).unwrap()
    }

    #[test]
    fn nearby_nodes_are_sorted_by_distance() {
        let graph = campus();
        let near: Vec<&str> = graph
            .nodes_within("gate", 150.0)
            .unwrap()
            .iter()
            .map(|(node, _)| node.id.as_str())
            .collect();
        assert_eq!(near, ["path", "lib", "pond"]);
    }

    #[test]
    fn indoor_radius_stays_on_the_floor() {
        let graph = campus();
        let near = graph.nodes_near(&Position::indoor(1, 0.0, 0.0), 6.0);
        assert_eq!(near.len(), 2);
        assert_eq!(near[1].0.id, "lab");
        assert_eq!(near[1].1, 5.0);
        assert!(graph.nodes_near(&Position::indoor(2, 0.0, 0.0), 50.0).is_empty());
    }

    #[test]
    fn unknown_center_is_an_error() {
        assert!(matches!(
            campus().nodes_within("nowhere", 10.0),
            Err(Error::UnknownNode(_))
        ));
    }

    #[test]
    fn category_filter() {
        let graph = campus();
        let rooms: Vec<&str> = graph
            .nodes_by_category(Category::Room)
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(rooms, ["room"]);
    }

    #[test]
    fn catalogue_orders_reachable_first() {
        let graph = campus();
        let catalogue =
            destinations_from(&graph, &Position::outdoor(0.0, 0.0), &RoutingOptions::default())
                .unwrap();
        let ids: Vec<&str> = catalogue.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["gate", "lib", "gym", "cafe"]);
        assert_eq!(catalogue[0].distance_m, Some(0.0));
        assert_eq!(catalogue[2].distance_m, Some(332.0));
        assert_eq!(catalogue[3].distance_m, None);
    }
}
