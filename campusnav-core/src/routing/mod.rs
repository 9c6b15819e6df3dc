//! Shortest-path routing on the campus graph

mod dijkstra;
mod options;
mod route;
mod router;
mod to_geojson;

pub use options::RoutingOptions;
pub use route::{Route, RouteLeg, RouteStep, StepAction};
pub(crate) use router::{destination_index, route_between};
pub use router::{route, route_to_many, route_with, shortest_path, shortest_path_with};
