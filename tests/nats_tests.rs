use translation_hub::ingest::TranscriptEvent;
use translation_hub::{IngestEvent, TranscriptMessage};

#[test]
fn test_transcript_deserialization() {
    let json = r#"{
        "session_id": "test-meeting",
        "text": "Hello world",
        "partial": false,
        "timestamp": "2025-10-27T14:30:05Z",
        "confidence": 0.95
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.session_id, "test-meeting");
    assert_eq!(msg.text, "Hello world");
    assert!(!msg.partial);
    assert_eq!(msg.confidence, Some(0.95));
    assert_eq!(msg.timestamp, "2025-10-27T14:30:05Z");
}

#[test]
fn test_transcript_no_confidence() {
    let json = r#"{
        "session_id": "test-meeting",
        "text": "No confidence score",
        "partial": false,
        "timestamp": "2025-10-27T14:30:05Z"
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.text, "No confidence score");
    assert_eq!(msg.confidence, None);
}

#[test]
fn test_final_transcript_becomes_final_event() {
    let json = r#"{
        "session_id": "khutba",
        "text": "In the name of God",
        "partial": false,
        "timestamp": "2025-10-27T14:30:05Z"
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    let event = IngestEvent::try_from(TranscriptEvent::from(msg)).unwrap();

    assert_eq!(event, IngestEvent::Final("In the name of God".to_string()));
}

#[test]
fn test_partial_transcript_becomes_partial_event() {
    let json = r#"{
        "session_id": "khutba",
        "text": "In the na",
        "partial": true,
        "timestamp": "2025-10-27T14:30:05Z",
        "confidence": 0.41
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    let event = IngestEvent::try_from(TranscriptEvent::from(msg)).unwrap();

    assert_eq!(event, IngestEvent::Partial("In the na".to_string()));
}

#[test]
fn test_transcript_missing_text_is_rejected() {
    let json = r#"{
        "session_id": "khutba",
        "partial": false,
        "timestamp": "2025-10-27T14:30:05Z"
    }"#;

    assert!(serde_json::from_str::<TranscriptMessage>(json).is_err());
}
