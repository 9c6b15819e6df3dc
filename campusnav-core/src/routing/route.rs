use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use super::dijkstra::SearchPath;
use crate::{
    Degrees, Meters,
    geodesy::{Cardinal, cardinal, format_distance},
    model::{CampusGraph, Transition, TransitionKind},
};

/// One edge of a route, in travel direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub distance: Meters,
    /// `None` when the endpoints use different coordinate systems or floors
    pub bearing: Option<Degrees>,
    /// Floor change is signed for the travel direction
    pub transition: Transition,
}

/// Shortest path from an anchor node to a destination
///
/// Routes are never modified; a recomputation produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub node_ids: Vec<String>,
    pub legs: Vec<RouteLeg>,
    /// Sum of leg distances
    pub total_distance: Meters,
    /// Search cost including penalties
    pub cost: f64,
    /// Generation of the graph this route was computed on
    pub generation: u64,
    #[serde(skip)]
    pub(crate) indices: Vec<NodeIndex>,
}

impl Route {
    pub(crate) fn from_search(graph: &CampusGraph, path: &SearchPath) -> Self {
        let node_ids: Vec<String> = path
            .nodes
            .iter()
            .filter_map(|&idx| graph.node(idx))
            .map(|node| node.id.clone())
            .collect();

        let legs: Vec<RouteLeg> = path
            .nodes
            .iter()
            .tuple_windows()
            .zip(&path.edges)
            .filter_map(|((&from, &to), &edge)| {
                let weight = graph.edge(edge)?;
                let (source, _) = graph.edge_endpoints(edge)?;
                let (from_node, to_node) = (graph.node(from)?, graph.node(to)?);
                let transition = if source == from {
                    weight.transition
                } else {
                    weight.transition.reversed()
                };
                Some(RouteLeg {
                    from: from_node.id.clone(),
                    to: to_node.id.clone(),
                    distance: weight.distance,
                    bearing: from_node.position.bearing_to(&to_node.position),
                    transition,
                })
            })
            .collect();

        Self {
            total_distance: legs.iter().map(|leg| leg.distance).sum(),
            node_ids,
            legs,
            cost: path.cost,
            generation: graph.generation(),
            indices: path.nodes.clone(),
        }
    }

    pub fn origin(&self) -> &str {
        self.node_ids.first().map_or("", String::as_str)
    }

    pub fn destination(&self) -> &str {
        self.node_ids.last().map_or("", String::as_str)
    }

    /// Walking distance of legs `leg..`
    pub fn distance_from_leg(&self, leg: usize) -> Meters {
        self.legs.iter().skip(leg).map(|leg| leg.distance).sum()
    }

    pub(crate) fn position_of(&self, node: NodeIndex) -> Option<usize> {
        self.indices.iter().position(|&idx| idx == node)
    }

    pub(crate) fn node_index(&self, position: usize) -> Option<NodeIndex> {
        self.indices.get(position).copied()
    }

    /// Turn-by-turn steps
    ///
    /// Consecutive legs heading the same way are merged. Floor changes get
    /// a step of their own and the list always ends with an arrival step.
    pub fn instructions(&self) -> Vec<RouteStep> {
        let mut steps: Vec<RouteStep> = Vec::with_capacity(self.legs.len() + 1);

        for (leg_index, leg) in self.legs.iter().enumerate() {
            let action = match leg.transition.kind() {
                Some(kind) => StepAction::Transition {
                    kind,
                    floor_change: leg.transition.floor_change,
                },
                None => StepAction::Walk {
                    direction: leg.bearing.map(cardinal),
                },
            };

            if let Some(last) = steps.last_mut()
                && last.action == action
                && matches!(action, StepAction::Walk { .. })
            {
                last.distance_m += leg.distance;
                last.to.clone_from(&leg.to);
                last.text = action.describe(last.distance_m);
                continue;
            }

            steps.push(RouteStep {
                leg_index,
                to: leg.to.clone(),
                distance_m: leg.distance,
                text: action.describe(leg.distance),
                action,
            });
        }

        steps.push(RouteStep {
            leg_index: self.legs.len(),
            to: self.destination().to_string(),
            distance_m: 0.0,
            action: StepAction::Arrive,
            text: "Arrive at destination".to_string(),
        });
        steps
    }
}

/// What to do on one step of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    Walk { direction: Option<Cardinal> },
    Transition { kind: TransitionKind, floor_change: i32 },
    Arrive,
}

impl StepAction {
    fn describe(self, distance: Meters) -> String {
        match self {
            StepAction::Walk {
                direction: Some(direction),
            } => format!("Head {} for {}", direction.long(), format_distance(distance)),
            StepAction::Walk { direction: None } => format!("Walk {}", format_distance(distance)),
            StepAction::Transition { kind, floor_change } => {
                Transition::of_kind(kind, floor_change).to_string()
            }
            StepAction::Arrive => "Arrive at destination".to_string(),
        }
    }
}

/// A single turn-by-turn step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    /// First leg covered by this step
    pub leg_index: usize,
    /// Node reached at the end of the step
    pub to: String,
    pub distance_m: Meters,
    pub action: StepAction,
    pub text: String,
}
