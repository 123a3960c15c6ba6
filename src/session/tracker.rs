use super::state::SessionState;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// A translation request captured at trigger time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    /// Rendered prompt containing the full transcript
    pub prompt: String,

    /// Final segment count the prompt was built from
    pub observed_segments: usize,

    /// Session epoch at trigger time
    pub epoch: u64,

    /// Requested by a prompt change rather than by new segments
    pub retranslation: bool,
}

impl TranslationJob {
    fn new(state: &SessionState, retranslation: bool) -> Self {
        Self {
            prompt: state.prompt_template.render(&state.transcript()),
            observed_segments: state.segment_count(),
            epoch: state.epoch,
            retranslation,
        }
    }

    /// Rebuild the job from a newer snapshot taken while the slot is held
    ///
    /// Returns `None` when the newer snapshot has nothing to translate.
    pub fn refresh(self, state: &SessionState) -> Option<Self> {
        if state.final_segments.is_empty() {
            return None;
        }
        let deficit = state.segment_count() > state.translated_segment_count;
        if !deficit && !self.retranslation {
            return None;
        }
        Some(Self::new(state, !deficit))
    }
}

/// Decides when a translation is due and keeps at most one in flight
///
/// The tracker only claims and releases the in-flight slot; dispatching the
/// job and applying its result is done by the [`Hub`](crate::Hub).
#[derive(Debug, Default)]
pub struct SegmentTracker {
    in_flight: AtomicBool,
    retranslate_requested: AtomicBool,
}

impl SegmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a fresh snapshot and claim a translation if one is due
    ///
    /// Returns `None` when everything is translated or a translation is
    /// already running; in the latter case the running job's completion
    /// re-checks, so nothing is lost.
    pub fn on_state_changed(&self, state: &SessionState) -> Option<TranslationJob> {
        if state.final_segments.is_empty() {
            self.retranslate_requested.store(false, Ordering::SeqCst);
            return None;
        }

        let deficit = state.segment_count() > state.translated_segment_count;
        if !deficit && !self.retranslate_requested.load(Ordering::SeqCst) {
            return None;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(
                segments = state.segment_count(),
                translated = state.translated_segment_count,
                "Translation already in flight, deferring"
            );
            return None;
        }
        self.retranslate_requested.store(false, Ordering::SeqCst);

        Some(TranslationJob::new(state, !deficit))
    }

    /// Force the next check to translate even if no new segment arrived
    pub fn request_retranslation(&self) {
        self.retranslate_requested.store(true, Ordering::SeqCst);
    }

    /// Free the in-flight slot after a job finished
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }

    /// Free the in-flight slot after a job failed
    ///
    /// A failed re-translation is requested again; a failed regular job
    /// needs nothing since its segment deficit is still there.
    pub fn fail(&self, job: &TranslationJob) {
        if job.retranslation {
            self.request_retranslation();
        }
        self.release();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}
