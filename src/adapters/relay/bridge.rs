//! Messaging relay backed by an external automation bridge.
//!
//! The bridge is a sidecar process that owns the actual messaging-account
//! session. This adapter drives it over a small HTTP surface:
//!
//! - `POST /session/start` - start or resume the session
//! - `POST /session/logout` - tear the session down
//! - `GET /session/status` - current state plus pairing code when pairing
//! - `POST /messages` - deliver a text message
//!
//! Session-state transitions are observed by polling `/session/status` and
//! published on a broadcast channel for the hub to forward to the
//! relay-interested connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::MessagingConfig;
use crate::ports::{MessagingRelay, RelayError, RelayReceipt, RelaySessionEvent};

use super::format_address;

/// Session states reported by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeState {
    Pairing,
    Ready,
    Disconnected,
    AuthFailure,
}

/// One `/session/status` response.
#[derive(Debug, Clone, Deserialize)]
struct StatusSnapshot {
    state: BridgeState,
    #[serde(default)]
    qr: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    #[serde(default)]
    authenticated: bool,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// HTTP call-through to the messaging bridge.
pub struct HttpBridgeRelay {
    http: reqwest::Client,
    config: MessagingConfig,
    authenticated: AtomicBool,
    events: broadcast::Sender<RelaySessionEvent>,
    last_status: Mutex<Option<StatusSnapshot>>,
}

impl HttpBridgeRelay {
    pub fn new(config: MessagingConfig) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            http: reqwest::Client::new(),
            config,
            authenticated: AtomicBool::new(false),
            events,
            last_status: Mutex::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.bridge_url.trim_end_matches('/'), path)
    }

    /// Polls the bridge session status and publishes state transitions.
    ///
    /// Runs until the process exits; poll failures are logged and retried on
    /// the next tick.
    pub fn spawn_event_pump(self: &Arc<Self>) -> JoinHandle<()> {
        let relay = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(relay.config.status_poll_secs));
            loop {
                ticker.tick().await;
                match relay.fetch_status().await {
                    Ok(snapshot) => relay.apply_status(snapshot),
                    Err(err) => debug!("messaging bridge status poll failed: {}", err),
                }
            }
        })
    }

    async fn fetch_status(&self) -> Result<StatusSnapshot, RelayError> {
        let response = self
            .http
            .get(self.endpoint("/session/status"))
            .send()
            .await
            .map_err(|e| RelayError::Bridge(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RelayError::Bridge(format!(
                "status endpoint returned {}",
                response.status()
            )));
        }
        response
            .json::<StatusSnapshot>()
            .await
            .map_err(|e| RelayError::Bridge(e.to_string()))
    }

    fn apply_status(&self, next: StatusSnapshot) {
        self.authenticated
            .store(next.state == BridgeState::Ready, Ordering::SeqCst);

        let mut last = self.last_status.lock().unwrap();
        for event in transition_events(last.as_ref(), &next) {
            let _ = self.events.send(event);
        }
        *last = Some(next);
    }
}

/// Session events implied by moving from `prev` to `next`.
fn transition_events(prev: Option<&StatusSnapshot>, next: &StatusSnapshot) -> Vec<RelaySessionEvent> {
    let prev_state = prev.map(|s| s.state);
    let mut events = Vec::new();

    match next.state {
        BridgeState::Ready => {
            if prev_state != Some(BridgeState::Ready) {
                events.push(RelaySessionEvent::Ready);
            }
        }
        BridgeState::Disconnected => {
            if prev_state != Some(BridgeState::Disconnected) {
                events.push(RelaySessionEvent::Disconnected(
                    next.detail.clone().unwrap_or_else(|| "disconnected".into()),
                ));
            }
        }
        BridgeState::AuthFailure => {
            if prev_state != Some(BridgeState::AuthFailure) {
                events.push(RelaySessionEvent::AuthFailure(
                    next.detail
                        .clone()
                        .unwrap_or_else(|| "authentication failed".into()),
                ));
            }
        }
        BridgeState::Pairing => {
            if let Some(qr) = &next.qr {
                let prev_qr = prev.and_then(|s| s.qr.as_deref());
                if prev_qr != Some(qr.as_str()) {
                    events.push(RelaySessionEvent::PairingCode(qr.clone()));
                }
            }
        }
    }

    events
}

#[async_trait]
impl MessagingRelay for HttpBridgeRelay {
    async fn initialize(&self) -> Result<(), RelayError> {
        let response = self
            .http
            .post(self.endpoint("/session/start"))
            .send()
            .await
            .map_err(|e| RelayError::Initialization(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RelayError::Initialization(format!(
                "session start returned {}",
                response.status()
            )));
        }
        let started = response
            .json::<StartResponse>()
            .await
            .map_err(|e| RelayError::Initialization(e.to_string()))?;
        self.authenticated
            .store(started.authenticated, Ordering::SeqCst);
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn force_re_pairing(&self) -> Result<(), RelayError> {
        self.http
            .post(self.endpoint("/session/logout"))
            .send()
            .await
            .map_err(|e| RelayError::Bridge(e.to_string()))?;
        self.authenticated.store(false, Ordering::SeqCst);

        // Give the bridge a moment to finish tearing the session down.
        tokio::time::sleep(Duration::from_secs(1)).await;

        self.initialize().await
    }

    async fn send_text(
        &self,
        contact: &str,
        body: &str,
    ) -> Result<Option<RelayReceipt>, RelayError> {
        let Some(address) = format_address(
            contact,
            &self.config.country_prefix,
            &self.config.address_suffix,
        ) else {
            warn!("refusing to send message to malformed contact {:?}", contact);
            return Ok(None);
        };

        if !self.is_authenticated() {
            warn!("messaging session not authenticated; message not sent");
            return Ok(None);
        }

        let response = self
            .http
            .post(self.endpoint("/messages"))
            .json(&serde_json::json!({ "to": address, "body": body }))
            .send()
            .await
            .map_err(|e| RelayError::Bridge(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RelayError::Bridge(format!(
                "message endpoint returned {}",
                response.status()
            )));
        }
        let sent = response
            .json::<SendResponse>()
            .await
            .map_err(|e| RelayError::Bridge(e.to_string()))?;

        Ok(Some(RelayReceipt {
            id: sent.id,
            to: address,
        }))
    }

    fn subscribe(&self) -> broadcast::Receiver<RelaySessionEvent> {
        self.events.subscribe()
    }
}
