//! `/api/messages` handlers.

use std::sync::Arc;

use {
    axum::{
        Json,
        extract::{Path, State, rejection::JsonRejection},
    },
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use chatterbox_sessions::{MessageRecord, SessionId};

use crate::{error::GatewayError, state::GatewayState};

/// Body of `POST /api/messages`. Both fields are optional on the wire so a
/// missing one becomes a 400 with a readable error instead of a parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub reply: String,
}

pub async fn post_message_handler(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<Json<PostMessageResponse>, GatewayError> {
    let Json(req) = body?;
    let session = SessionId::from_request(req.session_id).ok_or(GatewayError::MissingSessionId)?;
    let message = req.message.ok_or(GatewayError::MissingMessage)?;

    let reply = state.replies.select_reply(&message).to_string();
    state
        .store
        .append_exchange(
            &session,
            MessageRecord::user(message),
            MessageRecord::reply(reply.clone()),
        )
        .await;

    debug!(session = %session, "stored exchange");
    Ok(Json(PostMessageResponse { reply }))
}

pub async fn list_messages_handler(
    State(state): State<Arc<GatewayState>>,
    Path(session_id): Path<String>,
) -> Json<Vec<MessageRecord>> {
    let records = state.store.get(&session_id).await;
    debug!(session = %session_id, count = records.len(), "listed messages");
    Json(records)
}
