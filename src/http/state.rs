use crate::hub::Hub;
use crate::ingest::IngestGateway;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated entry point into the hub
    pub gateway: IngestGateway,

    /// Outbound frames queued per WebSocket subscriber
    pub subscriber_buffer: usize,
}

impl AppState {
    pub fn new(hub: Arc<Hub>, subscriber_buffer: usize) -> Self {
        Self {
            gateway: IngestGateway::new(hub),
            subscriber_buffer,
        }
    }

    pub fn hub(&self) -> &Arc<Hub> {
        self.gateway.hub()
    }
}
