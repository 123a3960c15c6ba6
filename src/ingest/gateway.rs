use super::events::{IngestEvent, PromptUpdate, RelayEvent, StartRecording, TranscriptEvent};
use crate::error::HubError;
use crate::fanout::BroadcastReport;
use crate::hub::Hub;
use crate::session::SessionState;
use std::sync::Arc;
use tracing::warn;

/// What an accepted event did
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// Session state changed and was broadcast
    Updated(Arc<SessionState>),

    /// Nothing to do (blank final segment routed without validation)
    Ignored,

    /// Event passed straight through to subscribers
    Relayed(BroadcastReport),
}

/// Entry point for every externally sourced event
#[derive(Clone)]
pub struct IngestGateway {
    hub: Arc<Hub>,
}

impl IngestGateway {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    pub async fn transcript(&self, event: TranscriptEvent) -> Result<IngestOutcome, HubError> {
        self.validate_and_handle(IngestEvent::try_from(event)).await
    }

    pub async fn relay(&self, event: RelayEvent) -> Result<IngestOutcome, HubError> {
        self.validate_and_handle(IngestEvent::try_from(event)).await
    }

    pub async fn start_recording(&self, request: StartRecording) -> Result<IngestOutcome, HubError> {
        self.handle(IngestEvent::from(request)).await
    }

    pub async fn update_prompt(&self, update: PromptUpdate) -> Result<IngestOutcome, HubError> {
        self.validate_and_handle(IngestEvent::try_from(update)).await
    }

    /// Route a validated event
    pub async fn handle(&self, event: IngestEvent) -> Result<IngestOutcome, HubError> {
        let outcome = match event {
            IngestEvent::Final(text) => match self.hub.append_final(&text).await {
                Some(state) => IngestOutcome::Updated(state),
                None => IngestOutcome::Ignored,
            },
            IngestEvent::Partial(text) => IngestOutcome::Updated(self.hub.set_partial(&text).await),
            IngestEvent::StartRecording { language } => {
                IngestOutcome::Updated(self.hub.start_recording(language).await)
            }
            IngestEvent::StopRecording => IngestOutcome::Updated(self.hub.stop_recording().await),
            IngestEvent::Clear => IngestOutcome::Updated(self.hub.clear().await),
            IngestEvent::UpdatePrompt(template) => match self.hub.update_prompt(&template).await {
                Ok(state) => IngestOutcome::Updated(state),
                Err(e) => {
                    warn!("Rejected prompt update: {}", e);
                    return Err(e);
                }
            },
            IngestEvent::Relay {
                kind,
                language,
                text,
                source,
            } => IngestOutcome::Relayed(self.hub.relay(kind, language, text, source).await),
        };
        Ok(outcome)
    }

    async fn validate_and_handle(
        &self,
        event: Result<IngestEvent, HubError>,
    ) -> Result<IngestOutcome, HubError> {
        match event {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                warn!("Dropping inbound event: {}", e);
                Err(e)
            }
        }
    }
}
