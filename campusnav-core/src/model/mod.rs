//! Data model for campus navigation
//!
//! Nodes, edges and the immutable graph they form.

pub mod edge;
pub mod graph;
pub mod node;
mod spatial;

pub use edge::{PathEdge, Transition, TransitionKind};
pub use graph::CampusGraph;
pub use node::{Category, FloorPoint, LatLng, Node, Position};
