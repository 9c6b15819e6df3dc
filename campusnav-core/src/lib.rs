//! Campus navigation engine
//!
//! Builds a routable graph out of outdoor waypoints and indoor floor-plan
//! nodes, computes shortest routes between a live position and a chosen
//! destination, and keeps a navigation session up to date while position and
//! heading samples stream in.

pub mod config;
pub mod error;
pub mod geodesy;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod query;
pub mod routing;
pub mod session;
pub mod source;
pub mod tracking;

pub use config::{NavigationConfig, RecomputePolicy};
pub use error::Error;
pub use loading::{CampusDataConfig, EdgeRecord, NodeRecord, build_graph, load_campus_graph};
pub use model::{CampusGraph, Category, FloorPoint, LatLng, Node, PathEdge, Position, Transition};
pub use routing::{Route, RouteLeg, RoutingOptions, route, shortest_path};
pub use session::{NavState, NavigationSession, SessionEvent, SessionSnapshot, start_session};
pub use tracking::{GpsQuality, HeadingReading, Instruction, PositionSample};

/// Distance in meters
pub type Meters = f64;
/// Compass bearing in degrees, clockwise from north
pub type Degrees = f64;

/// Mean Earth radius used by every great-circle computation
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
