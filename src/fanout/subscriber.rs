use super::message::Frame;
use crate::error::DeliveryError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::trace;

/// Send capability of one subscriber connection
///
/// Implementations may suspend while the transport applies backpressure;
/// the broadcaster bounds every call with its send timeout.
#[async_trait::async_trait]
pub trait Subscriber: Send + Sync {
    async fn send(&self, frame: Frame) -> Result<(), DeliveryError>;
}

/// Subscriber backed by a bounded queue drained by a transport writer task
///
/// Snapshot frames older than (or equal to) the last one queued are dropped,
/// so concurrent broadcasts can't rewind a client to an earlier state.
pub struct ChannelSubscriber {
    tx: mpsc::Sender<Arc<str>>,
    last_revision: Mutex<Option<u64>>,
}

impl ChannelSubscriber {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let subscriber = Self {
            tx,
            last_revision: Mutex::new(None),
        };
        (subscriber, rx)
    }
}

#[async_trait::async_trait]
impl Subscriber for ChannelSubscriber {
    async fn send(&self, frame: Frame) -> Result<(), DeliveryError> {
        let mut last_revision = self.last_revision.lock().await;

        if let Some(revision) = frame.revision {
            if last_revision.is_some_and(|last| revision <= last) {
                trace!(revision, "Dropping superseded snapshot");
                return Ok(());
            }
            *last_revision = Some(revision);
        }

        self.tx
            .send(frame.payload)
            .await
            .map_err(|_| DeliveryError::Closed)
    }
}
