//! Gateway: HTTP server for the chat widget.
//!
//! Lifecycle:
//! 1. Build [`state::GatewayState`] from config (message store + reply rules)
//! 2. Bind the listener
//! 3. Serve `/api/messages`, `/health` and, with `web-ui`, the widget assets
//!
//! Storage and reply selection live in `chatterbox-sessions` and
//! `chatterbox-auto-reply`; this crate only wires them to HTTP.

pub mod error;
pub mod messages;
pub mod server;
pub mod state;

pub use {error::GatewayError, server::build_gateway_app, state::GatewayState};
