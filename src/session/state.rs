use super::prompt::PromptTemplate;

/// Default source language
pub const DEFAULT_LANGUAGE: &str = "en";

/// The single snapshot of live session data
///
/// Only [`SessionStore`](super::SessionStore) ever holds this mutably;
/// everything else sees an `Arc<SessionState>` snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Finalized transcript segments, append-only
    pub final_segments: Vec<String>,

    /// Latest in-progress transcript text
    pub partial_transcript: String,

    /// Latest translation of the whole transcript
    pub translation: String,

    /// Final segments already covered by `translation`
    pub translated_segment_count: usize,

    pub is_recording: bool,

    pub prompt_template: PromptTemplate,

    /// Source language identifier (e.g. "en", "ar")
    pub language: String,

    /// Bumped on every mutation, survives clears
    pub revision: u64,

    /// Bumped on every clear
    pub epoch: u64,
}

impl SessionState {
    /// Full transcript: every final segment followed by a single space
    pub fn transcript(&self) -> String {
        let capacity = self.final_segments.iter().map(|s| s.len() + 1).sum();
        self.final_segments
            .iter()
            .fold(String::with_capacity(capacity), |mut out, segment| {
                out.push_str(segment);
                out.push(' ');
                out
            })
    }

    pub fn segment_count(&self) -> usize {
        self.final_segments.len()
    }

    /// Final segments not yet covered by a translation
    pub fn untranslated_segments(&self) -> usize {
        self.final_segments
            .len()
            .saturating_sub(self.translated_segment_count)
    }

    /// Zero the transcript state, keeping recording flag, prompt and language
    pub(crate) fn clear(&mut self) {
        self.final_segments.clear();
        self.partial_transcript.clear();
        self.translation.clear();
        self.translated_segment_count = 0;
        self.epoch += 1;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            final_segments: Vec::new(),
            partial_transcript: String::new(),
            translation: String::new(),
            translated_segment_count: 0,
            is_recording: false,
            prompt_template: PromptTemplate::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            revision: 0,
            epoch: 0,
        }
    }
}
