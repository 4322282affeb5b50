use {
    axum::{
        Json,
        extract::rejection::JsonRejection,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    tracing::warn,
};

/// Request failures surfaced to HTTP clients as `{ "error": "..." }`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Session ID required")]
    MissingSessionId,
    #[error("Message required")]
    MissingMessage,
    #[error("{0}")]
    InvalidBody(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingSessionId | Self::MissingMessage | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            },
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "request rejected");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
