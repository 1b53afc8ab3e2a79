//! WebSocket upgrade handler for dashboard connections.
//!
//! Handles the HTTP → WebSocket upgrade and runs the connection lifecycle:
//! register with the hub, pump outbound events to the socket, feed inbound
//! frames to the dispatcher, deregister on disconnect.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use super::commands::InboundFrame;
use super::hub::Hub;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: Arc<Hub>,
}

impl WebSocketState {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
///
/// No handshake payload is required; every upgrade becomes a registered
/// connection immediately.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs for the lifetime of one established connection.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let hub = state.hub;
    let (conn_id, mut outbound) = hub.connect().await;

    // Forward hub events to the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            if let Err(e) = sender.send(Message::Text(event.to_message())).await {
                debug!(connection = %conn_id, "send error, closing connection: {}", e);
                break;
            }
        }
    });

    // Feed inbound frames to the dispatcher.
    let recv_hub = Arc::clone(&hub);
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<InboundFrame>(&text) {
                    Ok(frame) => recv_hub.handle_frame(conn_id, frame).await,
                    Err(e) => {
                        warn!(connection = %conn_id, "discarding malformed frame: {}", e);
                    }
                },
                Ok(Message::Binary(_)) => {
                    warn!(connection = %conn_id, "received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level keepalive, handled by axum.
                }
                Ok(Message::Close(_)) => {
                    debug!(connection = %conn_id, "client sent close frame");
                    break;
                }
                Err(e) => {
                    debug!(connection = %conn_id, "receive error: {}", e);
                    break;
                }
            }
        }
    });

    // Whichever task finishes first tears the connection down.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.disconnect(conn_id).await;
}

/// Create the axum router for the WebSocket endpoint.
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/ws", get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::PlaintextCredentialVerifier;
    use crate::adapters::memory::{
        InMemoryCourierRepository, InMemoryCustomerRepository, InMemoryDeliveryRepository,
        InMemoryRelay,
    };
    use crate::application::{CourierService, CustomerService, DeliveryService};

    fn test_hub() -> Arc<Hub> {
        Hub::new(
            CustomerService::new(Arc::new(InMemoryCustomerRepository::new())),
            DeliveryService::new(Arc::new(InMemoryDeliveryRepository::new())),
            CourierService::new(
                Arc::new(InMemoryCourierRepository::new()),
                Arc::new(PlaintextCredentialVerifier),
            ),
            Arc::new(InMemoryRelay::new()),
        )
    }

    #[tokio::test]
    async fn websocket_state_shares_the_hub() {
        let hub = test_hub();
        let state = WebSocketState::new(Arc::clone(&hub));
        assert!(Arc::ptr_eq(&state.hub, &hub));
    }

    #[test]
    fn websocket_router_creates_route() {
        let _router = websocket_router();
    }
}
