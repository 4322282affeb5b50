use std::sync::Arc;

#[cfg(feature = "web-ui")]
use axum::response::Html;
use {
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    chrono::{SecondsFormat, Utc},
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use chatterbox_config::ChatterboxConfig;

use crate::{
    messages::{list_messages_handler, post_message_handler},
    state::GatewayState,
};

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    // The widget is embedded on third-party sites, so any origin may call us.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/messages", post(post_message_handler))
        .route("/api/messages/{session_id}", get(list_messages_handler));

    #[cfg(feature = "web-ui")]
    let router = router
        .route("/", get(root_handler))
        .route("/widget.js", get(widget_js_handler));

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server and run until it fails.
pub async fn start_gateway(config: ChatterboxConfig) -> anyhow::Result<()> {
    let state = GatewayState::from_config(&config);
    let app = build_gateway_app(Arc::clone(&state));

    let listener =
        tokio::net::TcpListener::bind((config.server.bind.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;

    // Startup banner.
    let cap = config
        .sessions
        .max_messages_per_session
        .map_or_else(|| "unbounded".to_string(), |n| n.to_string());
    let lines = [
        format!("chatterbox gateway v{}", state.version),
        format!("listening on http://{addr}"),
        format!("{} reply rules loaded", state.replies.rules().len()),
        format!("history per session: {cap}"),
    ];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "version": state.version,
        "uptimeSecs": state.uptime_secs(),
        "sessions": state.store.session_count().await,
    }))
}

#[cfg(feature = "web-ui")]
async fn root_handler() -> impl IntoResponse {
    Html(include_str!("assets/index.html"))
}

#[cfg(feature = "web-ui")]
async fn widget_js_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript; charset=utf-8")],
        include_str!("assets/widget.js"),
    )
}
