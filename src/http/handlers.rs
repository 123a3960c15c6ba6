use super::state::AppState;
use crate::error::HubError;
use crate::fanout::SnapshotMessage;
use crate::ingest::{
    IngestEvent, IngestOutcome, PromptUpdate, RelayEvent, StartRecording, TranscriptEvent,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::warn;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StartRecordingResponse {
    pub status: &'static str,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct RelayErrorResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub snapshot: SnapshotMessage,
    pub segments: usize,
    pub translated_segments: usize,
    pub translation_in_flight: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub subscribers: usize,
}

fn reject(err: HubError) -> Response {
    let status = match err {
        HubError::MalformedEvent(_) | HubError::InvalidTemplate(_) => StatusCode::BAD_REQUEST,
        HubError::TranslationFailure(_) | HubError::DeliveryFailure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn ok(status: &'static str) -> Response {
    (StatusCode::OK, Json(StatusMessage { status })).into_response()
}

fn malformed_body(rejection: JsonRejection) -> HubError {
    warn!("Rejected request body: {}", rejection.body_text());
    HubError::MalformedEvent("Invalid JSON".to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /transcript
/// Partial or final transcript from the transcription producer
pub async fn ingest_transcript(
    State(state): State<AppState>,
    body: Result<Json<TranscriptEvent>, JsonRejection>,
) -> Response {
    let event = match body {
        Ok(Json(event)) => event,
        Err(rejection) => return reject(malformed_body(rejection)),
    };

    match state.gateway.transcript(event).await {
        Ok(_) => ok("accepted"),
        Err(e) => reject(e),
    }
}

/// POST /broadcast
/// Relay an event from another producer to every subscriber
pub async fn relay_broadcast(
    State(state): State<AppState>,
    body: Result<Json<RelayEvent>, JsonRejection>,
) -> Response {
    let event = match body {
        Ok(Json(event)) => event,
        Err(rejection) => {
            warn!("Rejected broadcast body: {}", rejection.body_text());
            return relay_error("Invalid JSON".to_string());
        }
    };

    match state.gateway.relay(event).await {
        Ok(_) => ok("success"),
        Err(HubError::MalformedEvent(_)) => relay_error("Missing required fields".to_string()),
        Err(e) => relay_error(e.to_string()),
    }
}

fn relay_error(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(RelayErrorResponse {
            status: "error",
            message,
        }),
    )
        .into_response()
}

/// POST /start_recording
/// Body is optional; `{"language": "ar"}` switches the source language
pub async fn start_recording(
    State(state): State<AppState>,
    body: Option<Json<StartRecording>>,
) -> Response {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    match state.gateway.start_recording(request).await {
        Ok(IngestOutcome::Updated(session)) => (
            StatusCode::OK,
            Json(StartRecordingResponse {
                status: "recording_started",
                language: session.language.clone(),
            }),
        )
            .into_response(),
        Ok(_) => ok("recording_started"),
        Err(e) => reject(e),
    }
}

/// POST /stop_recording
pub async fn stop_recording(State(state): State<AppState>) -> Response {
    match state.gateway.handle(IngestEvent::StopRecording).await {
        Ok(_) => ok("recording_stopped"),
        Err(e) => reject(e),
    }
}

/// POST /clear
/// Reset transcript and translation, then rebroadcast
pub async fn clear(State(state): State<AppState>) -> Response {
    match state.gateway.handle(IngestEvent::Clear).await {
        Ok(_) => ok("cleared"),
        Err(e) => reject(e),
    }
}

/// POST /update_prompt
/// Replace the prompt template; re-translates an existing transcript
pub async fn update_prompt(
    State(state): State<AppState>,
    body: Result<Json<PromptUpdate>, JsonRejection>,
) -> Response {
    let update = match body {
        Ok(Json(update)) => update,
        Err(rejection) => return reject(malformed_body(rejection)),
    };

    match state.gateway.update_prompt(update).await {
        Ok(_) => ok("prompt_updated"),
        Err(e) => reject(e),
    }
}

/// GET /status
/// Current session snapshot
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let hub = state.hub();
    let session = hub.status();

    Json(StatusResponse {
        snapshot: SnapshotMessage::from_state(&session),
        segments: session.segment_count(),
        translated_segments: session.translated_segment_count,
        translation_in_flight: hub.translation_in_flight(),
    })
}

/// GET /health
/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            timestamp: chrono::Utc::now().to_rfc3339(),
            subscribers: state.hub().subscriber_count().await,
        }),
    )
}
