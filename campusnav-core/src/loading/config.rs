use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location and path feeds of one campus
///
/// Each feed is either a JSON array of records (`.json`) or a CSV file with
/// a header row (`.csv`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusDataConfig {
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
}

impl CampusDataConfig {
    pub fn new(nodes_path: impl Into<PathBuf>, edges_path: impl Into<PathBuf>) -> Self {
        Self {
            nodes_path: nodes_path.into(),
            edges_path: edges_path.into(),
        }
    }
}
