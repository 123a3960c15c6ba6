use std::time::Duration;

/// Errors surfaced by hub operations
///
/// None of these are fatal: each is recovered where it occurs and, at most,
/// reported back to the caller of a control operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HubError {
    /// Inbound event is missing a required field or has an unknown type
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Prompt template does not carry exactly one `{text}` placeholder
    #[error("Invalid prompt template: {0}")]
    InvalidTemplate(String),

    /// Translation collaborator returned an error or timed out
    #[error("Translation failed: {0}")]
    TranslationFailure(String),

    /// A subscriber connection could not be written to
    #[error("Delivery failed: {0}")]
    DeliveryFailure(#[from] DeliveryError),
}

/// Reasons a single subscriber send can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,

    #[error("send did not complete within {0:?}")]
    Timeout(Duration),
}
