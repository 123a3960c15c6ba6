use crate::error::HubError;
use serde::Deserialize;

/// Transcript update from the transcription producer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptEvent {
    /// "final" or "partial"
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
}

/// Event forwarded to subscribers as-is
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayEvent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,

    /// Producer subsystem; the configured relay source when absent
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRecording {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptUpdate {
    pub prompt: Option<String>,
}

/// A validated inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    Partial(String),
    Final(String),
    StartRecording {
        language: Option<String>,
    },
    StopRecording,
    Clear,
    UpdatePrompt(String),
    Relay {
        kind: String,
        language: String,
        text: String,
        source: Option<String>,
    },
}

/// Field must be present; its content is not checked
fn present(value: Option<String>, field: &str) -> Result<String, HubError> {
    value.ok_or_else(|| HubError::MalformedEvent(format!("missing required field `{}`", field)))
}

/// Field must be present and not blank
fn required(value: Option<String>, field: &str) -> Result<String, HubError> {
    match present(value, field)? {
        v if v.trim().is_empty() => Err(HubError::MalformedEvent(format!(
            "required field `{}` is empty",
            field
        ))),
        v => Ok(v),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<TranscriptEvent> for IngestEvent {
    type Error = HubError;

    /// Final text must not be blank. Partial text only has to be present:
    /// an empty partial clears the in-progress line.
    fn try_from(event: TranscriptEvent) -> Result<Self, Self::Error> {
        let kind = required(event.kind, "type")?;
        match kind.as_str() {
            "final" => Ok(Self::Final(required(event.text, "text")?)),
            "partial" => Ok(Self::Partial(present(event.text, "text")?)),
            other => Err(HubError::MalformedEvent(format!(
                "unknown transcript type `{}`, expected `final` or `partial`",
                other
            ))),
        }
    }
}

impl TryFrom<RelayEvent> for IngestEvent {
    type Error = HubError;

    fn try_from(event: RelayEvent) -> Result<Self, Self::Error> {
        Ok(Self::Relay {
            kind: required(event.kind, "type")?,
            language: required(event.language, "language")?,
            text: required(event.text, "text")?,
            source: non_blank(event.source),
        })
    }
}

impl From<StartRecording> for IngestEvent {
    fn from(request: StartRecording) -> Self {
        Self::StartRecording {
            language: non_blank(request.language),
        }
    }
}

impl TryFrom<PromptUpdate> for IngestEvent {
    type Error = HubError;

    fn try_from(update: PromptUpdate) -> Result<Self, Self::Error> {
        Ok(Self::UpdatePrompt(required(update.prompt, "prompt")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_event_from_json() {
        let event: TranscriptEvent =
            serde_json::from_str(r#"{"type": "final", "text": "Hello"}"#).unwrap();
        assert_eq!(
            IngestEvent::try_from(event).unwrap(),
            IngestEvent::Final("Hello".to_string())
        );
    }

    #[test]
    fn test_transcript_event_rejects_unknown_type() {
        let event = TranscriptEvent {
            kind: Some("interim".to_string()),
            text: Some("Hello".to_string()),
        };
        assert!(matches!(
            IngestEvent::try_from(event),
            Err(HubError::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_transcript_event_requires_text_field() {
        let event = TranscriptEvent {
            kind: Some("partial".to_string()),
            text: None,
        };
        assert!(IngestEvent::try_from(event).is_err());

        let cleared = TranscriptEvent {
            kind: Some("partial".to_string()),
            text: Some(String::new()),
        };
        assert_eq!(
            IngestEvent::try_from(cleared).unwrap(),
            IngestEvent::Partial(String::new())
        );
    }

    #[test]
    fn test_blank_final_text_is_rejected() {
        for text in ["", "   "] {
            let event = TranscriptEvent {
                kind: Some("final".to_string()),
                text: Some(text.to_string()),
            };
            assert_eq!(
                IngestEvent::try_from(event).unwrap_err(),
                HubError::MalformedEvent("required field `text` is empty".to_string())
            );
        }
    }

    #[test]
    fn test_relay_event_requires_all_fields() {
        let event: RelayEvent =
            serde_json::from_str(r#"{"type": "translation", "language": "", "text": "Hi"}"#)
                .unwrap();
        let err = IngestEvent::try_from(event).unwrap_err();
        assert_eq!(
            err,
            HubError::MalformedEvent("required field `language` is empty".to_string())
        );
    }

    #[test]
    fn test_blank_language_override_is_ignored() {
        let event = IngestEvent::from(StartRecording {
            language: Some("  ".to_string()),
        });
        assert_eq!(event, IngestEvent::StartRecording { language: None });
    }
}
