use super::prompt::PromptTemplate;
use super::state::SessionState;
use super::tracker::TranslationJob;
use crate::error::HubError;
use std::sync::Arc;
use tokio::sync::watch;

/// Owner of the session state
///
/// Mutations are serialized through the `watch` sender: each transition is
/// applied to a private copy and published as a new `Arc` in one step, so a
/// reader sees either the old or the new snapshot, never a half-applied one.
/// Snapshot reads never wait on a pending broadcast or translation.
pub struct SessionStore {
    state: watch::Sender<Arc<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(SessionState::default()));
        Self { state }
    }

    /// Current state, cheap to clone and share
    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.state.subscribe()
    }

    /// Apply a transition that may decline to change anything
    ///
    /// `f` returns whether it changed the state. Returns the published
    /// snapshot, or `None` when nothing changed.
    pub fn mutate<F>(&self, f: F) -> Option<Arc<SessionState>>
    where
        F: FnOnce(&mut SessionState) -> bool,
    {
        let mut published = None;
        self.state.send_if_modified(|current| {
            let mut next = SessionState::clone(current);
            if !f(&mut next) {
                return false;
            }
            next.revision += 1;
            let next = Arc::new(next);
            published = Some(Arc::clone(&next));
            *current = next;
            true
        });
        published
    }

    /// Apply a transition that always changes the state
    pub fn update<F>(&self, f: F) -> Arc<SessionState>
    where
        F: FnOnce(&mut SessionState),
    {
        let mut published = self.snapshot();
        self.state.send_modify(|current| {
            let mut next = SessionState::clone(current);
            f(&mut next);
            next.revision += 1;
            published = Arc::new(next);
            *current = Arc::clone(&published);
        });
        published
    }

    /// Append a final segment; blank text is ignored
    pub fn append_final_segment(&self, text: &str) -> Option<Arc<SessionState>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.update(|state| state.final_segments.push(text.to_string())))
    }

    pub fn set_partial(&self, text: &str) -> Arc<SessionState> {
        let text = text.trim();
        self.update(|state| state.partial_transcript = text.to_string())
    }

    pub fn set_translation(&self, text: &str) -> Arc<SessionState> {
        self.update(|state| state.translation = text.to_string())
    }

    pub fn set_recording(&self, is_recording: bool) -> Arc<SessionState> {
        self.update(|state| state.is_recording = is_recording)
    }

    pub fn set_language(&self, language: &str) -> Arc<SessionState> {
        self.update(|state| state.language = language.to_string())
    }

    /// Replace the prompt template; the previous one stays on error
    pub fn set_prompt_template(&self, template: &str) -> Result<Arc<SessionState>, HubError> {
        let template = PromptTemplate::parse(template)?;
        Ok(self.update(|state| state.prompt_template = template))
    }

    /// Zero the transcript, partial, translation and translated count
    pub fn reset(&self) -> Arc<SessionState> {
        self.update(SessionState::clear)
    }

    /// Store a finished translation unless the job it came from is stale
    ///
    /// A job is stale when the session was cleared after it was dispatched,
    /// or when it covers fewer segments than are already translated.
    pub fn apply_translation(&self, job: &TranslationJob, text: &str) -> Option<Arc<SessionState>> {
        self.mutate(|state| {
            if state.epoch != job.epoch
                || job.observed_segments < state.translated_segment_count
                || job.observed_segments > state.final_segments.len()
            {
                return false;
            }
            if !text.trim().is_empty() {
                state.translation = text.to_string();
            }
            state.translated_segment_count = job.observed_segments;
            true
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
