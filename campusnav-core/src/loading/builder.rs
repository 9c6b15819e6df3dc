use std::sync::Arc;

use hashbrown::{HashMap, hash_map::Entry};
use log::{info, warn};
use petgraph::{graph::UnGraph, visit::EdgeRef};

use super::config::CampusDataConfig;
use super::parser::read_records;
use super::records::{EdgeRecord, NodeRecord};
use crate::{
    Error,
    model::{CampusGraph, FloorPoint, LatLng, Node, PathEdge, Position, Transition},
};

/// Loads the location and path feeds and builds the campus graph
///
/// # Errors
///
/// Returns an error if a feed cannot be read or the data does not form a
/// valid graph
pub fn load_campus_graph(config: &CampusDataConfig) -> Result<CampusGraph, Error> {
    validate_config(config)?;

    info!("Reading locations: {}", config.nodes_path.display());
    let nodes: Vec<NodeRecord> = read_records(&config.nodes_path)?;

    info!("Reading paths: {}", config.edges_path.display());
    let edges: Vec<EdgeRecord> = read_records(&config.edges_path)?;

    let graph = build_graph(&nodes, &edges)?;
    info!(
        "Campus graph built: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let components = graph.component_count();
    if components > 1 {
        warn!(
            "Campus graph has {components} disconnected parts. Routes between them \
            will fail as unreachable."
        );
    }

    Ok(graph)
}

fn validate_config(config: &CampusDataConfig) -> Result<(), Error> {
    for path in [&config.nodes_path, &config.edges_path] {
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Feed file not found: {}", path.display()),
            )));
        }
    }
    Ok(())
}

/// Validates node and edge records and assembles the graph
///
/// Nodes and edges keep their feed order, which fixes neighbour iteration
/// order for routing.
///
/// # Errors
///
/// Returns `Error::Validation` for duplicate node ids, edges referencing an
/// unknown node, coordinates out of range, nodes without a position, and
/// negative or non-finite distances.
pub fn build_graph(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Result<CampusGraph, Error> {
    let mut graph = UnGraph::with_capacity(nodes.len(), edges.len());
    let mut index = HashMap::with_capacity(nodes.len());

    for record in nodes {
        let node = node_from_record(record)?;
        match index.entry(record.id.clone()) {
            Entry::Occupied(_) => {
                return Err(Error::Validation(format!(
                    "duplicate node id '{}'",
                    record.id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(graph.add_node(node));
            }
        }
    }

    for record in edges {
        let endpoint = |id: &str| {
            index.get(id).copied().ok_or_else(|| {
                Error::Validation(format!(
                    "edge {} -> {} references unknown node '{id}'",
                    record.from, record.to
                ))
            })
        };
        let from = endpoint(&record.from)?;
        let to = endpoint(&record.to)?;

        if !(record.distance.is_finite() && record.distance >= 0.0) {
            return Err(Error::Validation(format!(
                "edge {} -> {} has invalid distance {}",
                record.from, record.to, record.distance
            )));
        }

        graph.add_edge(
            from,
            to,
            PathEdge {
                distance: record.distance,
                transition: Transition {
                    stairs: record.is_stair,
                    elevator: record.is_elevator,
                    floor_change: record.floor_change,
                },
                accessible: record.accessible,
            },
        );
    }

    Ok(CampusGraph::from_parts(graph, index))
}

/// Builds a replacement for `current` from fresh feed data
///
/// The current graph is never touched; callers swap the returned `Arc`
/// in once it exists.
///
/// # Errors
///
/// Same as [`build_graph`]. On error the caller keeps using `current`.
pub fn rebuild_graph(
    current: &Arc<CampusGraph>,
    nodes: &[NodeRecord],
    edges: &[EdgeRecord],
) -> Result<Arc<CampusGraph>, Error> {
    let graph = build_graph(nodes, edges).inspect_err(|err| {
        warn!(
            "Rebuild rejected, keeping graph generation {}: {err}",
            current.generation()
        );
    })?;
    info!(
        "Graph generation {} replaces {} ({} nodes, {} edges)",
        graph.generation(),
        current.generation(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(Arc::new(graph))
}

fn node_from_record(record: &NodeRecord) -> Result<Node, Error> {
    if record.id.is_empty() {
        return Err(Error::Validation(format!(
            "node '{}' has an empty id",
            record.name
        )));
    }

    let position = match (record.lat, record.lng, record.x, record.y) {
        (Some(lat), Some(lng), _, _) => {
            let point = LatLng::new(lat, lng);
            if !point.is_valid() {
                return Err(Error::Validation(format!(
                    "node '{}' has coordinates out of range ({lat}, {lng})",
                    record.id
                )));
            }
            Position::Outdoor(point)
        }
        (_, _, Some(x), Some(y)) => {
            if !(x.is_finite() && y.is_finite()) {
                return Err(Error::Validation(format!(
                    "node '{}' has non-finite floor-plan coordinates",
                    record.id
                )));
            }
            Position::Indoor(FloorPoint {
                building: record.building.clone(),
                floor: record.floor.unwrap_or(0),
                x,
                y,
            })
        }
        _ => {
            return Err(Error::Validation(format!(
                "node '{}' has neither lat/lng nor x/y",
                record.id
            )));
        }
    };

    Ok(Node {
        id: record.id.clone(),
        name: record.name.clone(),
        position,
        category: record.category,
        destination_flag: record.is_destination,
        icon_override: record.icon.clone(),
    })
}

impl CampusGraph {
    /// Node and edge records this graph was built from
    ///
    /// Building a graph from the returned records yields an equivalent graph.
    pub fn records(&self) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        let nodes = self
            .graph
            .node_weights()
            .map(|node| {
                let mut record = NodeRecord {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    lat: None,
                    lng: None,
                    floor: None,
                    x: None,
                    y: None,
                    building: None,
                    category: node.category,
                    is_destination: node.destination_flag,
                    icon: node.icon_override.clone(),
                };
                match &node.position {
                    Position::Outdoor(p) => {
                        record.lat = Some(p.lat);
                        record.lng = Some(p.lng);
                    }
                    Position::Indoor(p) => {
                        record.floor = Some(p.floor);
                        record.x = Some(p.x);
                        record.y = Some(p.y);
                        record.building.clone_from(&p.building);
                    }
                }
                record
            })
            .collect();

        let edges = self
            .graph
            .edge_references()
            .map(|edge| EdgeRecord {
                from: self.graph[edge.source()].id.clone(),
                to: self.graph[edge.target()].id.clone(),
                distance: edge.weight().distance,
                is_stair: edge.weight().transition.stairs,
                is_elevator: edge.weight().transition.elevator,
                floor_change: edge.weight().transition.floor_change,
                accessible: edge.weight().accessible,
            })
            .collect();

        (nodes, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn campus() -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        let nodes = vec![
            NodeRecord::outdoor("gate", "Main Gate", 21.2890, 81.7000, Category::MainGate),
            NodeRecord::outdoor("lib", "Library", 21.2900, 81.7010, Category::Library)
                .as_destination(Some("📖")),
            NodeRecord::indoor("lobby", "Lobby", 0, 0.0, 0.0, Category::Entrance)
                .in_building("Library"),
            NodeRecord::indoor("stack", "Stacks", 1, 4.0, 9.0, Category::Room)
                .in_building("Library"),
        ];
        let edges = vec![
            EdgeRecord::new("gate", "lib", 150.0),
            EdgeRecord::new("lib", "lobby", 5.0),
            EdgeRecord::elevator("lobby", "stack", 6.0, 1),
        ];
        (nodes, edges)
    }

    #[test]
    fn builds_mixed_graph() {
        let (nodes, edges) = campus();
        let graph = build_graph(&nodes, &edges).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_by_id("lib").unwrap().icon(), "📖");
        assert!(graph.node_by_id("stack").unwrap().position.is_indoor());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let (mut nodes, edges) = campus();
        nodes.push(NodeRecord::outdoor("gate", "Back Gate", 21.28, 81.69, Category::MainGate));
        let err = build_graph(&nodes, &edges).unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let (nodes, mut edges) = campus();
        edges.push(EdgeRecord::new("gate", "ghost", 10.0));
        let err = build_graph(&nodes, &edges).unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("ghost")));
    }

    #[test]
    fn invalid_distances_are_rejected() {
        let (nodes, _) = campus();
        for distance in [-1.0, f64::NAN, f64::INFINITY] {
            let edges = [EdgeRecord::new("gate", "lib", distance)];
            assert!(matches!(build_graph(&nodes, &edges), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn out_of_range_and_missing_positions_are_rejected() {
        let bad_lat = [NodeRecord::outdoor("n", "N", 91.0, 0.0, Category::Other)];
        assert!(matches!(build_graph(&bad_lat, &[]), Err(Error::Validation(_))));

        let bad_lng = [NodeRecord::outdoor("n", "N", 0.0, -180.5, Category::Other)];
        assert!(matches!(build_graph(&bad_lng, &[]), Err(Error::Validation(_))));

        let mut nowhere = NodeRecord::outdoor("n", "N", 0.0, 0.0, Category::Other);
        nowhere.lng = None;
        assert!(matches!(build_graph(&[nowhere], &[]), Err(Error::Validation(_))));
    }

    #[test]
    fn indoor_floor_defaults_to_ground() {
        let mut record = NodeRecord::indoor("r", "R", 3, 1.0, 1.0, Category::Room);
        record.floor = None;
        let graph = build_graph(&[record], &[]).unwrap();
        assert_eq!(graph.node_by_id("r").unwrap().position.floor(), Some(0));
    }

    #[test]
    fn records_round_trip() {
        let (nodes, edges) = campus();
        let graph = build_graph(&nodes, &edges).unwrap();
        let (out_nodes, out_edges) = graph.records();
        assert_eq!(out_nodes, nodes);
        assert_eq!(out_edges, edges);
    }

    #[test]
    fn rebuild_keeps_current_on_error() {
        let (nodes, edges) = campus();
        let current = Arc::new(build_graph(&nodes, &edges).unwrap());

        let broken = [EdgeRecord::new("gate", "nowhere", 1.0)];
        assert!(rebuild_graph(&current, &nodes, &broken).is_err());
        assert_eq!(current.edge_count(), 3);

        let next = rebuild_graph(&current, &nodes, &edges[..1]).unwrap();
        assert_eq!(next.edge_count(), 1);
        assert!(next.generation() > current.generation());
    }
}
