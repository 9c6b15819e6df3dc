//! R-tree lookups used to anchor positions onto the graph

use std::f64::consts::PI;

use hashbrown::HashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use rstar::{RTree, primitives::GeomWithData};

use super::{Node, PathEdge, Position};
use crate::{EARTH_RADIUS_M, Meters, geodesy::distance_meters};

type Entry = GeomWithData<[f64; 2], NodeIndex>;

const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * PI / 180.0;

/// One tree for outdoor nodes and one per indoor floor.
///
/// Outdoor nodes are stored in an equirectangular projection around the
/// mean latitude of the campus; candidates are then ranked by true
/// haversine distance.
#[derive(Debug)]
pub(crate) struct SpatialIndex {
    outdoor: RTree<Entry>,
    lng_scale: f64,
    floors: HashMap<i32, RTree<Entry>>,
}

impl SpatialIndex {
    pub(crate) fn new(graph: &UnGraph<Node, PathEdge>) -> Self {
        let outdoor_lats: Vec<f64> = graph
            .node_weights()
            .filter_map(|node| match node.position {
                Position::Outdoor(p) => Some(p.lat),
                Position::Indoor(_) => None,
            })
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let mean_lat = if outdoor_lats.is_empty() {
            0.0
        } else {
            outdoor_lats.iter().sum::<f64>() / outdoor_lats.len() as f64
        };
        let lng_scale = mean_lat.to_radians().cos();

        let mut outdoor = Vec::with_capacity(outdoor_lats.len());
        let mut floors: HashMap<i32, Vec<Entry>> = HashMap::new();

        for idx in graph.node_indices() {
            match &graph[idx].position {
                Position::Outdoor(p) => {
                    outdoor.push(GeomWithData::new([p.lng * lng_scale, p.lat], idx));
                }
                Position::Indoor(p) => {
                    floors
                        .entry(p.floor)
                        .or_default()
                        .push(GeomWithData::new([p.x, p.y], idx));
                }
            }
        }

        Self {
            outdoor: RTree::bulk_load(outdoor),
            lng_scale,
            floors: floors
                .into_iter()
                .map(|(floor, entries)| (floor, RTree::bulk_load(entries)))
                .collect(),
        }
    }

    /// Nearest node to `position` and its distance.
    ///
    /// Ties go to the node inserted first.
    pub(crate) fn nearest(
        &self,
        graph: &UnGraph<Node, PathEdge>,
        position: &Position,
    ) -> Option<(NodeIndex, Meters)> {
        match position {
            Position::Outdoor(p) => {
                let query = [p.lng * self.lng_scale, p.lat];
                let origin = p.point();
                let mut best: Option<(NodeIndex, Meters)> = None;

                for (entry, d2) in self.outdoor.nearest_neighbor_iter_with_distance_2(&query) {
                    let projected = d2.sqrt() * METERS_PER_DEGREE;
                    if let Some((_, best_m)) = best
                        && projected > best_m * 1.05 + 1.0
                    {
                        break;
                    }
                    let Position::Outdoor(candidate) = graph[entry.data].position else {
                        continue;
                    };
                    let distance = distance_meters(&origin, &candidate.point());
                    best = match best {
                        Some((idx, d)) if d < distance || (d == distance && idx < entry.data) => {
                            Some((idx, d))
                        }
                        _ => Some((entry.data, distance)),
                    };
                }
                best
            }
            Position::Indoor(p) => {
                let tree = self.floors.get(&p.floor)?;
                let mut best: Option<(NodeIndex, f64)> = None;

                for (entry, d2) in tree.nearest_neighbor_iter_with_distance_2(&[p.x, p.y]) {
                    if let Some((_, best_d2)) = best
                        && d2 > best_d2
                    {
                        break;
                    }
                    let Position::Indoor(candidate) = &graph[entry.data].position else {
                        continue;
                    };
                    if !p.shares_floor_with(candidate) {
                        continue;
                    }
                    best = match best {
                        Some((idx, d)) if idx < entry.data => Some((idx, d)),
                        _ => Some((entry.data, d2)),
                    };
                }
                best.map(|(idx, d2)| (idx, d2.sqrt()))
            }
        }
    }

    /// Nodes within `radius` of `position`, closest first
    pub(crate) fn within(
        &self,
        graph: &UnGraph<Node, PathEdge>,
        position: &Position,
        radius: Meters,
    ) -> Vec<(NodeIndex, Meters)> {
        let mut found: Vec<(NodeIndex, Meters)> = match position {
            Position::Outdoor(p) => {
                let origin = p.point();
                // Projection error stays well below 5% on campus scales
                let search = radius / METERS_PER_DEGREE * 1.05;
                self.outdoor
                    .locate_within_distance([p.lng * self.lng_scale, p.lat], search * search)
                    .filter_map(|entry| match graph[entry.data].position {
                        Position::Outdoor(candidate) => {
                            Some((entry.data, distance_meters(&origin, &candidate.point())))
                        }
                        Position::Indoor(_) => None,
                    })
                    .filter(|&(_, distance)| distance <= radius)
                    .collect()
            }
            Position::Indoor(p) => match self.floors.get(&p.floor) {
                Some(tree) => tree
                    .locate_within_distance([p.x, p.y], radius * radius)
                    .filter(|entry| match &graph[entry.data].position {
                        Position::Indoor(candidate) => p.shares_floor_with(candidate),
                        Position::Outdoor(_) => false,
                    })
                    .map(|entry| {
                        let [x, y] = *entry.geom();
                        (entry.data, (x - p.x).hypot(y - p.y))
                    })
                    .collect(),
                None => Vec::new(),
            },
        };
        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found
    }
}
