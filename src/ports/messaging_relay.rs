//! Messaging relay port.
//!
//! The relay manages a single external messaging-account session (QR-code
//! pairing, ready/disconnected/auth-failure states) and sends text messages
//! to formatted addresses. The hub depends only on this contract; the
//! concrete integration is an HTTP call-through to an automation bridge.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

/// Failure of a relay operation that is NOT one of the two expected send
/// failures (malformed address, unauthenticated session).
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("messaging bridge unreachable: {0}")]
    Bridge(String),

    #[error("session initialization failed: {0}")]
    Initialization(String),
}

/// Receipt returned by the external account for a delivered message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayReceipt {
    /// Relay-assigned message identifier.
    pub id: String,
    /// The fully formatted address the message was delivered to.
    pub to: String,
}

/// Asynchronous session-state transitions delivered by the relay.
///
/// These are forwarded to whichever connection most recently registered
/// relay interest, independent of who caused them.
#[derive(Debug, Clone)]
pub enum RelaySessionEvent {
    /// A fresh pairing code is available for the dashboard to render.
    PairingCode(String),
    /// The session is paired and ready to send.
    Ready,
    /// The session dropped; sending will fail until re-paired.
    Disconnected(String),
    /// The external account rejected the session credentials.
    AuthFailure(String),
}

/// External messaging-account session and message relay.
#[async_trait]
pub trait MessagingRelay: Send + Sync {
    /// Start (or resume) the external session. Fails with the underlying
    /// cause; callers decide whether that is fatal.
    async fn initialize(&self) -> Result<(), RelayError>;

    /// Whether the session is currently paired and able to send.
    fn is_authenticated(&self) -> bool;

    /// Tear down the session and restart it to produce a fresh pairing code.
    async fn force_re_pairing(&self) -> Result<(), RelayError>;

    /// Send `body` to `contact`.
    ///
    /// Returns `Ok(None)` for the two expected failures - a malformed
    /// address or an unauthenticated session - and `Err` only for
    /// unexpected faults.
    async fn send_text(&self, contact: &str, body: &str)
        -> Result<Option<RelayReceipt>, RelayError>;

    /// Subscribe to asynchronous session-state transitions.
    fn subscribe(&self) -> broadcast::Receiver<RelaySessionEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messaging_relay_is_object_safe() {
        fn _accepts_dyn(_relay: &dyn MessagingRelay) {}
    }

    #[test]
    fn receipt_serializes_fields() {
        let receipt = RelayReceipt {
            id: "msg-1".into(),
            to: "5511999990000@c.us".into(),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("msg-1"));
        assert!(json.contains("@c.us"));
    }
}
