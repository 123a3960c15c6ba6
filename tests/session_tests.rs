// Integration tests for session state handling through the hub
//
// These tests verify that mutations are applied in order, that no-op
// mutations stay silent, and that subscribers always see consistent
// snapshots.

mod common;

use common::{hub_with, wait_for_translated, RecordingSubscriber, ScriptedTranslator};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_final_segments_keep_call_order() {
    let hub = hub_with(ScriptedTranslator::instant());
    let texts = ["In the name of God", "", "the Most Gracious", "  ", "the Most Merciful"];

    for text in texts {
        hub.append_final(text).await;
    }

    let state = hub.status();
    assert_eq!(state.segment_count(), 3, "Only non-empty segments count");
    assert_eq!(
        state.transcript(),
        "In the name of God the Most Gracious the Most Merciful "
    );
}

#[tokio::test]
async fn test_blank_final_segment_is_not_broadcast() {
    let hub = hub_with(ScriptedTranslator::instant());
    let subscriber = RecordingSubscriber::new();
    hub.connect(subscriber.clone()).await.unwrap();
    let onboarding = subscriber.count();
    let revision = hub.status().revision;

    assert!(hub.append_final("").await.is_none());
    assert!(hub.append_final("   ").await.is_none());

    assert_eq!(subscriber.count(), onboarding);
    assert_eq!(hub.status().revision, revision);
}

#[tokio::test]
async fn test_every_mutation_broadcasts_a_snapshot() {
    let hub = hub_with(ScriptedTranslator::instant());
    let subscriber = RecordingSubscriber::new();
    hub.connect(subscriber.clone()).await.unwrap();

    hub.start_recording(Some("ar".to_string())).await;
    hub.set_partial("Bismillah ar-").await;

    let snapshots = subscriber.snapshots();
    assert_eq!(snapshots.len(), 3, "Onboarding snapshot plus one per mutation");

    let latest = snapshots.last().unwrap();
    assert_eq!(latest["is_recording"], true);
    assert_eq!(latest["language"], "ar");
    assert_eq!(latest["partial_transcript"], "Bismillah ar-");
}

#[tokio::test]
async fn test_late_joiner_gets_only_current_state() {
    let hub = hub_with(ScriptedTranslator::instant());

    hub.start_recording(None).await;
    hub.append_final("Hello").await;
    wait_for_translated(&hub, 1).await;
    hub.set_partial("wor").await;
    assert!(hub.broadcaster().idle_broadcasts() >= 3);

    let subscriber = RecordingSubscriber::new();
    hub.connect(subscriber.clone()).await.unwrap();

    let frames = subscriber.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["type"], "connection");
    assert_eq!(frames[0]["status"], "connected");

    let snapshots = subscriber.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0]["transcript"], "Hello ");
    assert_eq!(snapshots[0]["partial_transcript"], "wor");
    assert_eq!(snapshots[0]["translation"], "translation #1");
    assert_eq!(snapshots[0]["is_recording"], true);
}

#[tokio::test]
async fn test_clear_resets_and_broadcasts_once() {
    let hub = hub_with(ScriptedTranslator::instant());
    let subscriber = RecordingSubscriber::new();
    hub.connect(subscriber.clone()).await.unwrap();

    hub.start_recording(None).await;
    hub.append_final("Hello").await;
    hub.set_partial("wor").await;
    wait_for_translated(&hub, 1).await;

    let before = subscriber.count();
    hub.clear().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(subscriber.count(), before + 1);

    let state = hub.status();
    assert!(state.final_segments.is_empty());
    assert_eq!(state.partial_transcript, "");
    assert_eq!(state.translation, "");
    assert_eq!(state.translated_segment_count, 0);
    assert!(state.is_recording, "Clear keeps the recording flag");

    let last = subscriber.frames().pop().unwrap();
    assert_eq!(last["transcript"], "");
    assert_eq!(last["partial_transcript"], "");
    assert_eq!(last["translation"], "");
}

#[tokio::test]
async fn test_status_read_does_not_mutate() {
    let hub = hub_with(ScriptedTranslator::instant());
    hub.set_partial("abc").await;

    let first = hub.status();
    let second = hub.status();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.revision, 1);
}

#[tokio::test]
async fn test_stop_recording() {
    let hub = hub_with(ScriptedTranslator::instant());
    hub.start_recording(Some("nl".to_string())).await;
    let state = hub.stop_recording().await;

    assert!(!state.is_recording);
    assert_eq!(state.language, "nl");
}
