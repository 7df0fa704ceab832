use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use tracing::{error, warn};

/// Failure of an alert endpoint, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// Body missing, not JSON, or `null`.
    NoData,
    /// Anything that went wrong while handling an otherwise readable payload.
    Internal(String),
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NoData => {
                warn!("Rejected request without a readable JSON body");
                (StatusCode::BAD_REQUEST, "No data received".to_string())
            }
            ApiError::Internal(message) => {
                error!("Failed to process alerts: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::NoData.into_response().status(), StatusCode::BAD_REQUEST);

        let err: ApiError = crate::Error::InvalidPayload("boom".to_string()).into();
        assert!(matches!(&err, ApiError::Internal(m) if m == "Invalid payload: boom"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
