//! Live session state
//!
//! This module owns the transcript/translation state of the running session:
//! - `SessionStore`: atomic mutation and snapshot reads
//! - `SegmentTracker`: decides when the transcript needs (re-)translation
//! - `PromptTemplate`: validated translation instruction template

mod prompt;
mod state;
mod store;
mod tracker;

pub use prompt::{PromptTemplate, PLACEHOLDER};
pub use state::{SessionState, DEFAULT_LANGUAGE};
pub use store::SessionStore;
pub use tracker::{SegmentTracker, TranslationJob};
