use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Application error taxonomy.
///
/// Every failure a request can hit ends up here and is turned into an HTTP
/// status plus a JSON body by [`IntoResponse`]. The body is always
/// `{"error": "<message>"}` so callers never see an unstructured failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Malformed request: {0}")]
    MalformedRequest(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("{0}")]
    UpstreamError(String),

    #[error("{0}")]
    EmptyResponse(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let (status, error_message) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::MalformedRequest(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Malformed request: {}", err),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Configuration error: {}", err),
            ),
            AppError::UpstreamError(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::EmptyResponse(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", err),
            ),
        };

        tracing::error!(status = %status, error = %error_message, "Request failed");

        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = serde_json::from_slice(&bytes).expect("response body was not valid JSON");
        (status, body)
    }

    #[tokio::test]
    async fn method_not_allowed_maps_to_405() {
        let (status, body) = response_parts(AppError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn upstream_message_is_relayed_untouched() {
        let (status, body) =
            response_parts(AppError::UpstreamError("API key not valid".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "API key not valid");
    }

    #[tokio::test]
    async fn every_failure_body_is_a_json_error_string() {
        let errors = vec![
            AppError::MethodNotAllowed,
            AppError::MalformedRequest(anyhow::anyhow!("expected value at line 1")),
            AppError::ConfigError(anyhow::anyhow!("GEMINI_API_KEY is not set")),
            AppError::UpstreamError("upstream said no".to_string()),
            AppError::EmptyResponse("no content".to_string()),
            AppError::InternalError(anyhow::anyhow!("boom")),
        ];

        for err in errors {
            let (_, body) = response_parts(err).await;
            let message = body["error"].as_str().expect("error field missing");
            assert!(!message.is_empty());
        }
    }
}
