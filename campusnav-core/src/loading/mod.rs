//! Loading node and edge feeds (JSON or CSV) and building the campus graph.

mod builder;
mod config;
mod parser;
mod records;

pub use builder::{build_graph, load_campus_graph, rebuild_graph};
pub use config::CampusDataConfig;
pub use parser::read_records;
pub use records::{EdgeRecord, NodeRecord};
