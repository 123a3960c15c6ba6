//! Ingest of producer events
//!
//! Raw records arrive from HTTP bodies or NATS payloads with every field
//! optional; `IngestGateway` validates them into `IngestEvent`s and routes
//! them to the hub. Malformed input is rejected without touching state.

mod events;
mod gateway;

pub use events::{IngestEvent, PromptUpdate, RelayEvent, StartRecording, TranscriptEvent};
pub use gateway::{IngestGateway, IngestOutcome};
