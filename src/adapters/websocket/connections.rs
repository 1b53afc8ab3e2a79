//! Connection registry - the hub's view of every live dashboard connection.
//!
//! The operation runs a single shared room: broadcasts reach every
//! registered handle, unicasts reach exactly one. Each connection owns an
//! unbounded outbound queue drained by its socket task; a connection that
//! disappears mid-send is simply dropped from the registry on its next
//! delivery attempt's failure or on disconnect.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::events::ServerEvent;

/// Ephemeral, process-local identifier for one connected observer.
///
/// Assigned on connect, destroyed on disconnect; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry of live connections and their outbound queues.
///
/// All mutation happens on the single cooperative runtime between
/// suspension points; the `RwLock` only arbitrates between the connection
/// lifecycle (writes) and event fan-out (reads).
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and returns its handle plus the receiving
    /// end of its outbound queue.
    pub async fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(id, tx);
        (id, rx)
    }

    /// Removes a connection. Safe to call for an already-removed handle.
    pub async fn unregister(&self, id: ConnectionId) {
        self.connections.write().await.remove(&id);
    }

    /// Delivers an event to one connection. Returns whether the handle was
    /// still registered and accepting.
    pub async fn unicast(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let connections = self.connections.read().await;
        match connections.get(&id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Delivers an event to every registered connection.
    pub async fn broadcast(&self, event: ServerEvent) {
        let connections = self.connections.read().await;
        for tx in connections.values() {
            let _ = tx.send(event.clone());
        }
    }

    /// Delivers an event to every registered connection except `skip`.
    pub async fn broadcast_except(&self, skip: ConnectionId, event: ServerEvent) {
        let connections = self.connections.read().await;
        for (id, tx) in connections.iter() {
            if *id != skip {
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Number of currently registered connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> ServerEvent {
        ServerEvent::TodayDeliveries(vec![])
    }

    #[tokio::test]
    async fn register_hands_out_distinct_ids() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = registry.register().await;
        let (b, _rx_b) = registry.register().await;
        assert_ne!(a, b);
        assert_eq!(registry.connection_count().await, 2);
    }

    #[tokio::test]
    async fn unicast_reaches_only_the_target() {
        let registry = ConnectionRegistry::new();
        let (a, mut rx_a) = registry.register().await;
        let (_b, mut rx_b) = registry.register().await;

        assert!(registry.unicast(a, probe()).await);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let registry = ConnectionRegistry::new();
        let (_a, mut rx_a) = registry.register().await;
        let (_b, mut rx_b) = registry.register().await;
        let (_c, mut rx_c) = registry.register().await;

        registry.broadcast(probe()).await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
        assert!(rx_c.try_recv().is_ok());
    }

    #[tokio::test]
    async fn broadcast_except_skips_the_sender() {
        let registry = ConnectionRegistry::new();
        let (a, mut rx_a) = registry.register().await;
        let (_b, mut rx_b) = registry.register().await;

        registry.broadcast_except(a, probe()).await;

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn unregister_stops_delivery() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = registry.register().await;

        registry.unregister(a).await;

        assert!(!registry.unicast(a, probe()).await);
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = registry.register().await;
        registry.unregister(a).await;
        registry.unregister(a).await;
    }
}
