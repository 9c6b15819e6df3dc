// Re-export key components
pub use crate::config::{NavigationConfig, RecomputePolicy};
pub use crate::error::Error;
pub use crate::loading::{
    CampusDataConfig, EdgeRecord, NodeRecord, build_graph, load_campus_graph, rebuild_graph,
};
pub use crate::model::{CampusGraph, Category, Node, Position, Transition, TransitionKind};
pub use crate::query::{NodeSummary, destinations_from};
pub use crate::routing::{
    Route, RouteStep, RoutingOptions, route, route_to_many, route_with, shortest_path,
    shortest_path_with,
};
pub use crate::session::{
    NavState, NavigationSession, PositionUpdate, SessionEvent, SessionSnapshot, start_session,
};
pub use crate::source::{HeadingSource, LocationError, NoHeadingSensor, PositionSource, drive};
pub use crate::tracking::{GpsQuality, HeadingReading, Instruction, PositionSample, track};

// Units
pub use crate::Degrees;
pub use crate::Meters;
