use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use petgraph::{
    graph::{EdgeIndex, EdgeReference, NodeIndex, UnGraph},
    visit::EdgeRef,
};

use super::{Node, PathEdge, Position, spatial::SpatialIndex};
use crate::{Error, Meters};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Routable graph for one campus or building
///
/// Immutable once built. A rebuild produces a new graph with a fresh
/// generation number, so routes computed against an older graph can be
/// told apart.
#[derive(Debug)]
pub struct CampusGraph {
    pub(crate) graph: UnGraph<Node, PathEdge>,
    index: HashMap<String, NodeIndex>,
    spatial: SpatialIndex,
    generation: u64,
}

impl CampusGraph {
    pub(crate) fn from_parts(
        graph: UnGraph<Node, PathEdge>,
        index: HashMap<String, NodeIndex>,
    ) -> Self {
        let spatial = SpatialIndex::new(&graph);
        Self {
            graph,
            index,
            spatial,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|idx| &self.graph[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    pub(crate) fn edge(&self, idx: EdgeIndex) -> Option<&PathEdge> {
        self.graph.edge_weight(idx)
    }

    pub(crate) fn edge_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Edges touching `node`, in the order they were added to the graph
    pub(crate) fn incident_edges(&self, node: NodeIndex) -> Vec<EdgeReference<'_, PathEdge>> {
        let mut edges: Vec<_> = self.graph.edges(node).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
    }

    /// Neighbours of a node with the connecting edge, in insertion order
    pub fn neighbors(&self, id: &str) -> Result<Vec<(&Node, &PathEdge)>, Error> {
        let idx = self
            .node_index(id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))?;
        Ok(self
            .incident_edges(idx)
            .into_iter()
            .map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                (&self.graph[other], edge.weight())
            })
            .collect())
    }

    /// Node closest to `position`
    ///
    /// Outdoor positions are compared by great-circle distance against
    /// outdoor nodes only; indoor positions by floor-plan distance against
    /// nodes on the same floor.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoNodeFound` when no node shares the position's
    /// coordinate system (or floor).
    pub fn nearest_node(&self, position: &Position) -> Result<&Node, Error> {
        self.anchor(position).map(|(idx, _)| &self.graph[idx])
    }

    pub(crate) fn anchor(&self, position: &Position) -> Result<(NodeIndex, Meters), Error> {
        self.spatial
            .nearest(&self.graph, position)
            .ok_or_else(|| Error::NoNodeFound(position.describe()))
    }

    pub(crate) fn within(&self, position: &Position, radius: Meters) -> Vec<(NodeIndex, Meters)> {
        self.spatial.within(&self.graph, position, radius)
    }

    /// Number of disconnected parts of the graph
    pub fn component_count(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{EdgeRecord, NodeRecord, build_graph};
    use crate::model::{Category, FloorPoint};

    fn mixed_graph() -> CampusGraph {
        let nodes = vec![
            NodeRecord::outdoor("gate", "Main Gate", 21.2890, 81.7000, Category::MainGate),
            NodeRecord::outdoor("quad", "Quad", 21.2895, 81.7005, Category::Landmark),
            NodeRecord::indoor("lobby", "Lobby", 0, 0.0, 0.0, Category::Entrance),
            NodeRecord::indoor("r101", "Room 101", 1, 5.0, 5.0, Category::Room),
            NodeRecord::indoor("r102", "Room 102", 1, 20.0, 5.0, Category::Room),
        ];
        let edges = vec![
            EdgeRecord::new("gate", "quad", 70.0),
            EdgeRecord::new("quad", "lobby", 15.0),
            EdgeRecord::stairs("lobby", "r101", 8.0, 1),
            EdgeRecord::new("r101", "r102", 15.0),
        ];
        build_graph(&nodes, &edges).unwrap()
    }

    #[test]
    fn nearest_outdoor_node() {
        let graph = mixed_graph();
        let near_quad = Position::outdoor(21.2894, 81.7004);
        assert_eq!(graph.nearest_node(&near_quad).unwrap().id, "quad");
    }

    #[test]
    fn nearest_indoor_node_stays_on_floor() {
        let graph = mixed_graph();
        // (1, 1) on floor 1 is closest to r101 even though the lobby is
        // closer on the plan
        let node = graph.nearest_node(&Position::indoor(1, 1.0, 1.0)).unwrap();
        assert_eq!(node.id, "r101");
        let node = graph.nearest_node(&Position::indoor(1, 18.0, 4.0)).unwrap();
        assert_eq!(node.id, "r102");
    }

    #[test]
    fn empty_floor_has_no_anchor() {
        let graph = mixed_graph();
        let err = graph.nearest_node(&Position::indoor(7, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::NoNodeFound(_)));
    }

    #[test]
    fn building_filter_applies_when_named() {
        let nodes = vec![
            NodeRecord::indoor("a", "A", 0, 0.0, 0.0, Category::Room).in_building("Admin"),
            NodeRecord::indoor("b", "B", 0, 1.0, 0.0, Category::Room).in_building("Library"),
        ];
        let graph = build_graph(&nodes, &[]).unwrap();
        let query = Position::Indoor(FloorPoint::new(0, 0.9, 0.0).in_building("Admin"));
        assert_eq!(graph.nearest_node(&query).unwrap().id, "a");
    }

    #[test]
    fn equidistant_nodes_resolve_to_first_inserted() {
        let nodes = vec![
            NodeRecord::indoor("left", "Left", 0, -1.0, 0.0, Category::Room),
            NodeRecord::indoor("right", "Right", 0, 1.0, 0.0, Category::Room),
        ];
        let graph = build_graph(&nodes, &[]).unwrap();
        assert_eq!(graph.nearest_node(&Position::indoor(0, 0.0, 0.0)).unwrap().id, "left");
    }

    #[test]
    fn neighbours_in_insertion_order() {
        let graph = mixed_graph();
        let ids: Vec<_> = graph
            .neighbors("quad")
            .unwrap()
            .into_iter()
            .map(|(node, _)| node.id.as_str())
            .collect();
        assert_eq!(ids, ["gate", "lobby"]);
    }

    #[test]
    fn generations_are_unique() {
        assert_ne!(mixed_graph().generation(), mixed_graph().generation());
    }

    #[test]
    fn single_component() {
        assert_eq!(mixed_graph().component_count(), 1);
    }
}
