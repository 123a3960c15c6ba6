//! The live translation hub
//!
//! `Hub` ties the session store, segment tracker, broadcaster and translator
//! together. Every state mutation goes through one of its operations, which
//! broadcasts the fresh snapshot and lets the tracker decide whether a
//! translation is due.

use crate::config::HubConfig;
use crate::error::HubError;
use crate::fanout::{
    BroadcastMessage, BroadcastReport, Broadcaster, ConnectionAck, ConnectionHandle,
    EventMessage, Subscriber,
};
use crate::session::{SegmentTracker, SessionState, SessionStore, TranslationJob};
use crate::translation::Translator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Hub {
    store: SessionStore,
    tracker: SegmentTracker,
    broadcaster: Broadcaster,
    translator: Arc<dyn Translator>,
    translation_timeout: Duration,
    relay_source: String,
}

impl Hub {
    pub fn new(
        config: &HubConfig,
        translator: Arc<dyn Translator>,
        translation_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            store: SessionStore::new(),
            tracker: SegmentTracker::new(),
            broadcaster: Broadcaster::new(config.send_timeout()),
            translator,
            translation_timeout,
            relay_source: config.relay_source.clone(),
        })
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Current session state; never mutates
    pub fn status(&self) -> Arc<SessionState> {
        self.store.snapshot()
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub fn translation_in_flight(&self) -> bool {
        self.tracker.is_in_flight()
    }

    pub async fn subscriber_count(&self) -> usize {
        self.broadcaster.registry().len().await
    }

    // ------------------------------------------------------------------
    // Producer events
    // ------------------------------------------------------------------

    /// Append a final transcript segment; blank text changes nothing
    pub async fn append_final(self: &Arc<Self>, text: &str) -> Option<Arc<SessionState>> {
        let state = self.store.append_final_segment(text)?;
        debug!(segments = state.segment_count(), "Final segment appended");
        self.commit(Arc::clone(&state)).await;
        Some(state)
    }

    pub async fn set_partial(self: &Arc<Self>, text: &str) -> Arc<SessionState> {
        let state = self.store.set_partial(text);
        self.commit(Arc::clone(&state)).await;
        state
    }

    /// Forward an event from another producer without touching session state
    pub async fn relay(
        &self,
        kind: String,
        language: String,
        text: String,
        source: Option<String>,
    ) -> BroadcastReport {
        let source = source.unwrap_or_else(|| self.relay_source.clone());
        info!(
            kind = %kind,
            language = %language,
            source = %source,
            "Relaying event: {}",
            text.chars().take(50).collect::<String>()
        );

        let event = EventMessage::new(kind, language, text, source);
        self.broadcaster
            .broadcast(&BroadcastMessage::Event(event))
            .await
    }

    // ------------------------------------------------------------------
    // Control operations
    // ------------------------------------------------------------------

    pub async fn start_recording(self: &Arc<Self>, language: Option<String>) -> Arc<SessionState> {
        let state = self.store.update(|state| {
            if let Some(language) = language {
                state.language = language;
            }
            state.is_recording = true;
        });
        info!(language = %state.language, "Recording started");
        self.commit(Arc::clone(&state)).await;
        state
    }

    pub async fn stop_recording(self: &Arc<Self>) -> Arc<SessionState> {
        let state = self.store.set_recording(false);
        info!("Recording stopped");
        self.commit(Arc::clone(&state)).await;
        state
    }

    /// Reset transcript and translation; an in-flight translation is discarded
    /// when it completes
    pub async fn clear(self: &Arc<Self>) -> Arc<SessionState> {
        let state = self.store.reset();
        info!(epoch = state.epoch, "Session cleared");
        self.commit(Arc::clone(&state)).await;
        state
    }

    /// Replace the prompt template and re-translate any existing transcript
    pub async fn update_prompt(self: &Arc<Self>, template: &str) -> Result<Arc<SessionState>, HubError> {
        let state = self.store.set_prompt_template(template)?;
        if !state.final_segments.is_empty() {
            self.tracker.request_retranslation();
        }
        info!("Prompt updated");
        self.commit(Arc::clone(&state)).await;
        Ok(state)
    }

    // ------------------------------------------------------------------
    // Subscribers
    // ------------------------------------------------------------------

    /// Register a subscriber and bring it up to date with the current state
    ///
    /// The acknowledgement goes out before registration, so it is always the
    /// first frame. The snapshot is taken after registration; a broadcast
    /// racing it carries a newer revision and supersedes it.
    pub async fn connect(&self, subscriber: Arc<dyn Subscriber>) -> Result<ConnectionHandle, HubError> {
        let ack = BroadcastMessage::Connected(ConnectionAck::now());
        self.broadcaster.greet(subscriber.as_ref(), &ack).await?;

        let handle = self.broadcaster.register(subscriber).await;
        let state = self.store.snapshot();
        self.broadcaster
            .send_to(&handle, &[BroadcastMessage::snapshot(&state)])
            .await?;
        Ok(handle)
    }

    pub async fn disconnect(&self, handle: &ConnectionHandle) -> bool {
        self.broadcaster.unregister(handle).await
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Run after every successful mutation
    async fn commit(self: &Arc<Self>, state: Arc<SessionState>) {
        self.check_translation(&state);
        self.broadcaster
            .broadcast(&BroadcastMessage::snapshot(&state))
            .await;
    }

    fn check_translation(self: &Arc<Self>, state: &SessionState) {
        let Some(job) = self.tracker.on_state_changed(state) else {
            return;
        };

        // The slot is held; translate the state current now, not the
        // snapshot that triggered the check
        let current = self.store.snapshot();
        let Some(job) = job.refresh(&current) else {
            self.tracker.release();
            return;
        };

        info!(
            segments = job.observed_segments,
            translated = current.translated_segment_count,
            "New segments detected, updating translation"
        );
        let hub = Arc::clone(self);
        tokio::spawn(async move { hub.run_translation(job).await });
    }

    async fn run_translation(self: Arc<Self>, job: TranslationJob) {
        let translation =
            tokio::time::timeout(self.translation_timeout, self.translator.translate(&job.prompt));
        let result = match translation.await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(HubError::TranslationFailure(format!("{:#}", e))),
            Err(_) => Err(HubError::TranslationFailure(format!(
                "no response within {:?}",
                self.translation_timeout
            ))),
        };

        match result {
            Ok(text) => {
                match self.store.apply_translation(&job, &text) {
                    Some(state) => {
                        info!(
                            translated = state.translated_segment_count,
                            "Translation updated"
                        );
                        self.broadcaster
                            .broadcast(&BroadcastMessage::snapshot(&state))
                            .await;
                    }
                    None => {
                        info!(
                            segments = job.observed_segments,
                            "Discarding translation for a cleared or superseded transcript"
                        );
                    }
                }
                self.tracker.release();

                // Segments appended while this job ran
                let state = self.store.snapshot();
                self.check_translation(&state);
            }
            Err(e) => {
                self.tracker.fail(&job);
                warn!(
                    segments = job.observed_segments,
                    "{}; will retry on the next state change", e
                );
            }
        }
    }
}
