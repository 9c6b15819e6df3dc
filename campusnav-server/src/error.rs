use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use campusnav_core::Error;
use serde_json::json;
use tower::BoxError;

/// Error body returned by every handler: `{ "kind": ..., "message": ... }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    pub fn session_not_found(id: u64) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "SessionNotFoundError",
            format!("No session with id {id}"),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BadRequestError", message)
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalError",
            err.to_string(),
        )
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Validation(_) | Error::InvalidData(_) | Error::Csv(_) | Error::Json(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::InvalidDestination(_) | Error::UnknownNode(_) => StatusCode::NOT_FOUND,
            Error::NoNodeFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Unreachable { .. } | Error::NoPositionFix | Error::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            Error::LocationPermission => StatusCode::FORBIDDEN,
            Error::LocationTimeout => StatusCode::SERVICE_UNAVAILABLE,
            Error::IoError(_) | Error::GeoJsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}: {}", self.kind, self.message);
        }
        let body = json!({ "kind": self.kind, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Maps failures of the tower middleware stack
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::new(
            StatusCode::REQUEST_TIMEOUT,
            "TimeoutError",
            "Request took too long",
        )
    } else {
        ApiError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_keep_their_kind() {
        let err = ApiError::from(Error::InvalidDestination("lab".into()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.kind, "InvalidDestinationError");

        let err = ApiError::from(Error::Unreachable {
            from: "a".into(),
            to: "b".into(),
        });
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.kind, "UnreachableError");
    }
}
