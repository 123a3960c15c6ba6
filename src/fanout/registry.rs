//! Registry of live subscriber connections

use super::subscriber::Subscriber;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque identifier of a registered connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle(Uuid);

impl ConnectionHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Set of open subscriber connections
///
/// Iteration works on a point-in-time copy, so connections added or removed
/// while a broadcast is running neither disturb it nor take part in it.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionHandle, Arc<dyn Subscriber>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, subscriber: Arc<dyn Subscriber>) -> ConnectionHandle {
        let handle = ConnectionHandle::new();
        let mut connections = self.connections.write().await;
        connections.insert(handle, subscriber);

        tracing::info!(
            connection = %handle,
            total = connections.len(),
            "Subscriber registered"
        );
        handle
    }

    /// Remove a connection; returns whether it was still registered
    pub async fn remove(&self, handle: &ConnectionHandle) -> bool {
        let mut connections = self.connections.write().await;
        let removed = connections.remove(handle).is_some();

        if removed {
            tracing::info!(
                connection = %handle,
                total = connections.len(),
                "Subscriber removed"
            );
        }
        removed
    }

    pub async fn get(&self, handle: &ConnectionHandle) -> Option<Arc<dyn Subscriber>> {
        self.connections.read().await.get(handle).cloned()
    }

    /// Point-in-time copy of every registered connection
    pub async fn snapshot(&self) -> Vec<(ConnectionHandle, Arc<dyn Subscriber>)> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(handle, subscriber)| (*handle, Arc::clone(subscriber)))
            .collect()
    }

    pub async fn contains(&self, handle: &ConnectionHandle) -> bool {
        self.connections.read().await.contains_key(handle)
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
