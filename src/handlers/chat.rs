//! Placeholder chat endpoint.

use axum::body::Bytes;

pub const CHAT_REPLY: &str = "Hola";

/// Always answers with a fixed greeting; the request body is ignored.
pub async fn chat(body: Bytes) -> &'static str {
    tracing::debug!(body_len = body.len(), "chat request");
    CHAT_REPLY
}
