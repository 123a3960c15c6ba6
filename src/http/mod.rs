//! HTTP API and subscriber WebSocket
//!
//! Control operations (operator UI):
//! - POST /start_recording - Mark the session as recording, optional language
//! - POST /stop_recording - Mark the session as stopped
//! - POST /clear - Reset transcript and translation
//! - POST /update_prompt - Replace the translation prompt template
//! - GET /status - Current session snapshot
//!
//! Producers:
//! - POST /transcript - Partial/final transcript event
//! - POST /broadcast - Event relayed straight to subscribers
//!
//! Subscribers:
//! - GET /ws - WebSocket receiving snapshots and relayed events
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;
mod ws;

pub use routes::create_router;
pub use state::AppState;
