use thiserror::Error;

use crate::session::NavState;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid graph data: {0}")]
    Validation(String),
    #[error("No node found to anchor a position on {0}")]
    NoNodeFound(String),
    #[error("No route available from {from} to {to}")]
    Unreachable { from: String, to: String },
    #[error("Destination not found: {0}")]
    InvalidDestination(String),
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("No position fix available")]
    NoPositionFix,
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: NavState,
    },
    #[error("Timed out waiting for a location fix")]
    LocationTimeout,
    #[error("Location permission denied")]
    LocationPermission,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}

impl Error {
    /// Error kind as reported to the presentation layer
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "ValidationError",
            Error::NoNodeFound(_) => "NoNodeFoundError",
            Error::Unreachable { .. } => "UnreachableError",
            Error::InvalidDestination(_) => "InvalidDestinationError",
            Error::UnknownNode(_) => "UnknownNodeError",
            Error::NoPositionFix => "NoPositionFixError",
            Error::InvalidTransition { .. } => "InvalidTransitionError",
            Error::LocationTimeout => "LocationTimeoutError",
            Error::LocationPermission => "LocationPermissionError",
            Error::IoError(_) => "IoError",
            Error::Csv(_) | Error::Json(_) | Error::InvalidData(_) => "InvalidDataError",
            Error::GeoJsonError(_) => "GeoJsonError",
        }
    }

    /// Whether a later position sample may clear the condition
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::NoNodeFound(_)
                | Error::Unreachable { .. }
                | Error::NoPositionFix
                | Error::LocationTimeout
                | Error::LocationPermission
        )
    }
}
