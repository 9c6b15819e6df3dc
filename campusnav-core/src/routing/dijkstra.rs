use std::{cmp::Ordering, collections::BinaryHeap};

use fixedbitset::FixedBitSet;
use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use super::RoutingOptions;
use crate::model::CampusGraph;

#[derive(Copy, Clone, Debug)]
struct State {
    cost: f64,
    /// Push order, breaks ties between equal costs
    seq: u64,
    node: NodeIndex,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

// Min-heap by cost, then first pushed first
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Path found by [`dijkstra_path`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchPath {
    pub(crate) nodes: Vec<NodeIndex>,
    /// `edges[i]` connects `nodes[i]` and `nodes[i + 1]`
    pub(crate) edges: Vec<EdgeIndex>,
    pub(crate) cost: f64,
}

/// Shortest path from `start` to `target`, `None` when unreachable
///
/// Neighbours are relaxed in edge insertion order and a predecessor is
/// only replaced by a strictly cheaper one, so among equally short paths
/// the one discovered first wins.
pub(crate) fn dijkstra_path(
    graph: &CampusGraph,
    start: NodeIndex,
    target: NodeIndex,
    options: &RoutingOptions,
) -> Option<SearchPath> {
    let node_count = graph.node_count();
    let mut costs = vec![f64::INFINITY; node_count];
    let mut predecessors: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; node_count];
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::new();
    let mut seq = 0;

    costs[start.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        seq,
        node: start,
    });

    while let Some(State { cost, node, .. }) = heap.pop() {
        if settled.put(node.index()) {
            continue;
        }
        if node == target {
            break;
        }

        for edge in graph.incident_edges(node) {
            let Some(edge_cost) = options.edge_cost(edge.weight()) else {
                continue;
            };
            let next = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            if settled.contains(next.index()) {
                continue;
            }

            let next_cost = cost + edge_cost;
            if next_cost < costs[next.index()] {
                costs[next.index()] = next_cost;
                predecessors[next.index()] = Some((node, edge.id()));
                seq += 1;
                heap.push(State {
                    cost: next_cost,
                    seq,
                    node: next,
                });
            }
        }
    }

    if !settled.contains(target.index()) {
        return None;
    }

    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;
    while let Some((prev, edge)) = predecessors[current.index()] {
        nodes.push(prev);
        edges.push(edge);
        current = prev;
    }
    nodes.reverse();
    edges.reverse();

    Some(SearchPath {
        nodes,
        edges,
        cost: costs[target.index()],
    })
}
