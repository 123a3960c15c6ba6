use crate::ingest::TranscriptEvent;
use serde::{Deserialize, Serialize};

/// Transcript message received from the STT service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String, // RFC3339 timestamp
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl From<TranscriptMessage> for TranscriptEvent {
    fn from(msg: TranscriptMessage) -> Self {
        let kind = if msg.partial { "partial" } else { "final" };
        TranscriptEvent {
            kind: Some(kind.to_string()),
            text: Some(msg.text),
        }
    }
}
