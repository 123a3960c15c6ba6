//! Translation collaborator
//!
//! The hub only needs "prompt in, translated text out"; `OpenAiTranslator`
//! provides that over an OpenAI-compatible chat completions endpoint.

mod openai;

pub use openai::OpenAiTranslator;

use anyhow::Result;

/// Turns a rendered prompt into translated text
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, prompt: &str) -> Result<String>;
}
