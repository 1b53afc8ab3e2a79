//! In-memory implementation of MessagingRelay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::adapters::relay::format_address;
use crate::ports::{MessagingRelay, RelayError, RelayReceipt, RelaySessionEvent};

/// Scriptable relay for tests and offline development.
///
/// Applies the same address-formatting contract as the bridge relay and
/// records every delivered message. Session events can be pushed through
/// [`InMemoryRelay::push_event`] to exercise the hub's relay-interest
/// forwarding.
pub struct InMemoryRelay {
    authenticated: AtomicBool,
    fail_initialize: AtomicBool,
    sent: Mutex<Vec<(String, String)>>,
    events: broadcast::Sender<RelaySessionEvent>,
}

impl InMemoryRelay {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            authenticated: AtomicBool::new(false),
            fail_initialize: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            events,
        }
    }

    /// A relay that starts out paired and ready to send.
    pub fn authenticated() -> Self {
        let relay = Self::new();
        relay.set_authenticated(true);
        relay
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }

    /// Make the next `initialize` call fail.
    pub fn fail_initialize(&self) {
        self.fail_initialize.store(true, Ordering::SeqCst);
    }

    /// Messages delivered so far, as (formatted address, body) pairs.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Push a session event to every subscriber.
    pub fn push_event(&self, event: RelaySessionEvent) {
        let _ = self.events.send(event);
    }
}

impl Default for InMemoryRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagingRelay for InMemoryRelay {
    async fn initialize(&self) -> Result<(), RelayError> {
        if self.fail_initialize.swap(false, Ordering::SeqCst) {
            return Err(RelayError::Initialization("scripted failure".into()));
        }
        self.set_authenticated(true);
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn force_re_pairing(&self) -> Result<(), RelayError> {
        self.set_authenticated(false);
        self.push_event(RelaySessionEvent::PairingCode("scripted-qr".into()));
        Ok(())
    }

    async fn send_text(
        &self,
        contact: &str,
        body: &str,
    ) -> Result<Option<RelayReceipt>, RelayError> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        let Some(address) = format_address(contact, "55", "@c.us") else {
            return Ok(None);
        };
        let mut sent = self.sent.lock().unwrap();
        let receipt = RelayReceipt {
            id: format!("mem-{}", sent.len() + 1),
            to: address.clone(),
        };
        sent.push((address, body.to_string()));
        Ok(Some(receipt))
    }

    fn subscribe(&self) -> broadcast::Receiver<RelaySessionEvent> {
        self.events.subscribe()
    }
}
