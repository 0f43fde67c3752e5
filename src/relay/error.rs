use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing image or bin data")]
    MissingFields,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Model API URL not configured")]
    ModelNotConfigured,

    #[error("Model API unreachable: {0}")]
    Upstream(String),

    #[error("Model API error: {0}")]
    UpstreamStatus(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::MissingFields | RelayError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::ModelNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Upstream(_) | RelayError::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
