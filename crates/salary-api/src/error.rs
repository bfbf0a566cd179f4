//! Request-level errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salary_core::ValidationErrors;
use serde_json::json;

/// Errors that end a request
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body rejected before reaching the model
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// The model failed on a valid feature vector
    #[error("{0}")]
    Inference(String),

    #[error("Not Found")]
    NotFound,
}

impl From<salary_core::Error> for ApiError {
    fn from(err: salary_core::Error) -> Self {
        match err {
            salary_core::Error::Inference(message) => ApiError::Inference(message),
            other => ApiError::Inference(other.to_string()),
        }
    }
}

impl ApiError {
    /// Inference failures share the client-error status with validation
    /// failures so existing clients see the status codes they always have.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Inference(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({ "detail": errors }),
            ApiError::Inference(message) => json!({ "detail": message }),
            ApiError::NotFound => json!({ "detail": "Not Found" }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salary_core::PredictionRequest;

    #[test]
    fn test_both_request_failures_are_client_errors() {
        let validation: ApiError = PredictionRequest::new(10, 0, 0, 0).unwrap_err().into();
        let inference: ApiError = salary_core::Error::inference("singular matrix").into();

        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(inference.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_inference_keeps_error_text() {
        let err: ApiError = salary_core::Error::inference("singular matrix").into();
        assert_eq!(err.to_string(), "singular matrix");

        let err: ApiError = salary_core::Error::model("bad tree").into();
        assert_eq!(err.to_string(), "model error: bad tree");
    }
}
