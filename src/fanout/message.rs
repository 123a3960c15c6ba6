use crate::session::SessionState;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Line break token understood by display clients
const LINE_BREAK: &str = "<br/>";

/// Seconds since the Unix epoch, with sub-second precision
pub fn unix_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

fn encode_line_breaks(text: &str) -> String {
    text.replace("\r\n", LINE_BREAK).replace('\n', LINE_BREAK)
}

/// Full session state as pushed to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub transcript: String,
    pub partial_transcript: String,
    pub translation: String,
    pub is_recording: bool,
    pub language: String,

    /// Store revision the snapshot was taken at
    #[serde(skip)]
    pub revision: u64,
}

impl SnapshotMessage {
    pub const KIND: &'static str = "translation_update";

    pub fn from_state(state: &SessionState) -> Self {
        Self {
            kind: Self::KIND,
            transcript: encode_line_breaks(&state.transcript()),
            partial_transcript: state.partial_transcript.clone(),
            translation: encode_line_breaks(&state.translation),
            is_recording: state.is_recording,
            language: state.language.clone(),
            revision: state.revision,
        }
    }
}

/// Discrete point event relayed from another producer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub language: String,
    pub text: String,
    pub timestamp: f64,
    pub source: String,
}

impl EventMessage {
    pub fn new(kind: String, language: String, text: String, source: String) -> Self {
        Self {
            kind,
            language,
            text,
            timestamp: unix_timestamp(),
            source,
        }
    }
}

/// Sent once to a subscriber as soon as it is registered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionAck {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub status: &'static str,
    pub timestamp: f64,
}

impl ConnectionAck {
    pub fn now() -> Self {
        Self {
            kind: "connection",
            status: "connected",
            timestamp: unix_timestamp(),
        }
    }
}

/// Anything the broadcaster pushes to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BroadcastMessage {
    Snapshot(SnapshotMessage),
    Event(EventMessage),
    Connected(ConnectionAck),
}

impl BroadcastMessage {
    pub fn snapshot(state: &SessionState) -> Self {
        Self::Snapshot(SnapshotMessage::from_state(state))
    }

    /// Serialize once for delivery to any number of connections
    pub fn encode(&self) -> serde_json::Result<Frame> {
        let revision = match self {
            Self::Snapshot(snapshot) => Some(snapshot.revision),
            _ => None,
        };
        Ok(Frame {
            revision,
            payload: serde_json::to_string(self)?.into(),
        })
    }
}

/// An encoded message ready to be written to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Set for snapshots so stale ones can be dropped per connection
    pub revision: Option<u64>,
    pub payload: Arc<str>,
}
