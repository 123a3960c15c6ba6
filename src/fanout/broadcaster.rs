use super::message::{BroadcastMessage, Frame};
use super::registry::{ConnectionHandle, ConnectionRegistry};
use super::subscriber::Subscriber;
use crate::error::{DeliveryError, HubError};
use futures::future::join_all;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Pushes messages to every registered connection
///
/// Sends run concurrently, each bounded by `send_timeout`. A connection whose
/// send fails or times out is removed; the others are unaffected.
pub struct Broadcaster {
    registry: ConnectionRegistry,
    send_timeout: Duration,
    idle_broadcasts: AtomicU64,
}

impl Broadcaster {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            send_timeout,
            idle_broadcasts: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub async fn register(&self, subscriber: Arc<dyn Subscriber>) -> ConnectionHandle {
        self.registry.add(subscriber).await
    }

    pub async fn unregister(&self, handle: &ConnectionHandle) -> bool {
        self.registry.remove(handle).await
    }

    /// Broadcasts that found no connection to deliver to
    pub fn idle_broadcasts(&self) -> u64 {
        self.idle_broadcasts.load(Ordering::Relaxed)
    }

    pub async fn broadcast(&self, message: &BroadcastMessage) -> BroadcastReport {
        let targets = self.registry.snapshot().await;
        if targets.is_empty() {
            self.idle_broadcasts.fetch_add(1, Ordering::Relaxed);
            debug!("No subscribers connected, broadcast skipped");
            return BroadcastReport::default();
        }

        let frame = match message.encode() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to encode broadcast message: {}", e);
                return BroadcastReport::default();
            }
        };

        let results = join_all(targets.iter().map(|(handle, subscriber)| {
            let frame = frame.clone();
            async move { (*handle, self.deliver(subscriber.as_ref(), frame).await) }
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (handle, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(connection = %handle, "Dropping subscriber: {}", e);
                    self.registry.remove(&handle).await;
                    report.failed += 1;
                }
            }
        }

        debug!(
            delivered = report.delivered,
            failed = report.failed,
            "Broadcast complete"
        );
        report
    }

    /// Deliver one message to a subscriber that is not registered yet
    pub async fn greet(
        &self,
        subscriber: &dyn Subscriber,
        message: &BroadcastMessage,
    ) -> Result<(), HubError> {
        let frame = match message.encode() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to encode greeting: {}", e);
                return Ok(());
            }
        };

        self.deliver(subscriber, frame).await.map_err(|e| {
            warn!("Subscriber failed before registration: {}", e);
            e.into()
        })
    }

    /// Deliver messages, in order, to a single connection
    ///
    /// Used to bring a newly registered connection up to date. The
    /// connection is removed if any send fails.
    pub async fn send_to(
        &self,
        handle: &ConnectionHandle,
        messages: &[BroadcastMessage],
    ) -> Result<(), HubError> {
        let subscriber = self
            .registry
            .get(handle)
            .await
            .ok_or(DeliveryError::Closed)?;

        for message in messages {
            let frame = match message.encode() {
                Ok(frame) => frame,
                Err(e) => {
                    error!("Failed to encode message for {}: {}", handle, e);
                    continue;
                }
            };

            if let Err(e) = self.deliver(subscriber.as_ref(), frame).await {
                warn!(connection = %handle, "Dropping subscriber during onboarding: {}", e);
                self.registry.remove(handle).await;
                return Err(e.into());
            }
        }
        Ok(())
    }

    async fn deliver(&self, subscriber: &dyn Subscriber, frame: Frame) -> Result<(), DeliveryError> {
        match tokio::time::timeout(self.send_timeout, subscriber.send(frame)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(self.send_timeout)),
        }
    }
}
