use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound relay request.
///
/// `history` is the ordered conversation forwarded to the upstream API
/// verbatim. Message internals are opaque to this service; whatever the
/// frontend sends is what the upstream sees.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub history: Vec<Value>,
}

/// Success body: the text extracted from the upstream response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
}
