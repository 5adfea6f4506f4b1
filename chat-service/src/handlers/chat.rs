use crate::dtos::{ChatRequest, ChatResponse};
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, Json};
use service_core::error::AppError;

/// Relay a conversation to the upstream API and return the generated text.
///
/// The body is parsed by hand instead of through the `Json` extractor so a
/// parse failure flows through the same error funnel as everything else and
/// the caller always gets a JSON `{"error": ...}` body.
pub async fn relay_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let request: ChatRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::MalformedRequest(anyhow::anyhow!(e)))?;

    tracing::info!(
        message_count = request.history.len(),
        "Relaying chat history upstream"
    );

    let text = state.provider.generate(&request.history).await?;

    Ok(Json(ChatResponse { text }))
}

/// Fallback for every non-POST method on the chat route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
