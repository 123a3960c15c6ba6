use crate::error::HubError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder substituted with the full transcript
pub const PLACEHOLDER: &str = "{text}";

const DEFAULT_TEMPLATE: &str = "You are an expert English-to-Dutch translator. \
Translate the following English text to Dutch. \
Only provide the Dutch translation, without any additional commentary or explanations.\n\
English text: {text}\n\
Dutch translation:";

/// Instruction template for translation requests
///
/// Always holds exactly one [`PLACEHOLDER`]; construction through
/// [`PromptTemplate::parse`] enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn parse(template: impl Into<String>) -> Result<Self, HubError> {
        let template = template.into();
        match template.matches(PLACEHOLDER).count() {
            1 => Ok(Self(template)),
            0 => Err(HubError::InvalidTemplate(format!(
                "template must contain the {} placeholder",
                PLACEHOLDER
            ))),
            n => Err(HubError::InvalidTemplate(format!(
                "template contains {} placeholder {} times, expected once",
                PLACEHOLDER, n
            ))),
        }
    }

    /// Substitute `text` for the placeholder
    pub fn render(&self, text: &str) -> String {
        self.0.replacen(PLACEHOLDER, text, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self(DEFAULT_TEMPLATE.to_string())
    }
}

impl TryFrom<String> for PromptTemplate {
    type Error = HubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PromptTemplate> for String {
    fn from(value: PromptTemplate) -> Self {
        value.0
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
