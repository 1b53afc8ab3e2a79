//! Realtime session hub - command dispatch and event fan-out.
//!
//! The hub owns every live connection and decides, per command, who sees
//! the result: the broadcast policy table maps each command to its success
//! audience, and every failure becomes an `error`-shaped event for the
//! requester alone. No failure inside a command handler ever terminates a
//! connection or the process.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{CourierService, CustomerService, DeliveryService};
use crate::domain::{Courier, Customer, Delivery};
use crate::ports::{MessagingRelay, RelaySessionEvent};

use super::commands::{
    AuthenticateRequest, ClientCommand, CommandKind, CommandParseError, InboundFrame,
    SendMessageRequest,
};
use super::connections::{ConnectionId, ConnectionRegistry};
use super::events::{
    now_timestamp, BroadcastAck, BroadcastPayload, EchoResponse, ErrorEnvelope, MessageSendReply,
    RelayStatusPayload, ServerEvent, ServerNotice,
};
use super::policy::{audience_for, Audience};

/// The in-process broadcast authority.
pub struct Hub {
    connections: ConnectionRegistry,
    /// The zero-or-one connection registered to receive asynchronous relay
    /// session events. Written only by the relay commands and the
    /// disconnect path.
    relay_interest: RwLock<Option<ConnectionId>>,
    customers: CustomerService,
    deliveries: DeliveryService,
    couriers: CourierService,
    relay: Arc<dyn MessagingRelay>,
}

impl Hub {
    pub fn new(
        customers: CustomerService,
        deliveries: DeliveryService,
        couriers: CourierService,
        relay: Arc<dyn MessagingRelay>,
    ) -> Arc<Self> {
        Arc::new(Self {
            connections: ConnectionRegistry::new(),
            relay_interest: RwLock::new(None),
            customers,
            deliveries,
            couriers,
            relay,
        })
    }

    /// Registers a new connection, returning its handle and outbound queue.
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let (id, rx) = self.connections.register().await;
        info!(connection = %id, "client connected");
        (id, rx)
    }

    /// Deregisters a connection. No persisted side effects.
    pub async fn disconnect(&self, id: ConnectionId) {
        self.connections.unregister(id).await;
        let mut interest = self.relay_interest.write().await;
        if *interest == Some(id) {
            *interest = None;
        }
        info!(connection = %id, "client disconnected");
    }

    /// Number of currently connected handles.
    pub async fn connection_count(&self) -> usize {
        self.connections.connection_count().await
    }

    /// Entry point for one inbound frame from an established connection.
    pub async fn handle_frame(&self, conn: ConnectionId, frame: InboundFrame) {
        match ClientCommand::from_frame(frame) {
            Ok(command) => self.dispatch(conn, command).await,
            Err(CommandParseError::UnknownEvent(name)) => {
                // Deliberate no-op; the wire surface is fixed.
                warn!(connection = %conn, event = %name, "ignoring unrecognized command");
            }
            Err(CommandParseError::InvalidPayload { kind, detail }) => {
                warn!(
                    connection = %conn,
                    command = kind.wire_name(),
                    "rejected malformed payload: {}",
                    detail
                );
                self.fail(conn, kind, Some(detail)).await;
            }
        }
    }

    /// Routes a validated command to its handler.
    pub async fn dispatch(&self, conn: ConnectionId, command: ClientCommand) {
        info!(connection = %conn, command = command.kind().wire_name(), "dispatching command");
        match command {
            ClientCommand::TodayDeliveries => self.today_deliveries(conn).await,
            ClientCommand::FetchCustomers => self.fetch_customers(conn).await,
            ClientCommand::FetchCouriers => self.fetch_couriers(conn).await,
            ClientCommand::AddDelivery(delivery) => self.add_delivery(conn, *delivery).await,
            ClientCommand::UpdateDelivery(delivery) => self.update_delivery(conn, *delivery).await,
            ClientCommand::UpsertCustomer(customer) => self.upsert_customer(conn, *customer).await,
            ClientCommand::AuthenticateCourier(request) => {
                self.authenticate_courier(conn, request).await
            }
            ClientCommand::LocateCourier(courier) => self.locate_courier(conn, *courier).await,
            ClientCommand::DeliveryReport => self.delivery_report(conn).await,
            ClientCommand::RelayLogin => self.relay_login(conn).await,
            ClientCommand::RelayStatusCheck => self.relay_status_check(conn).await,
            ClientCommand::RelayForcePairing => self.relay_force_pairing(conn).await,
            ClientCommand::SendMessage(request) => self.send_message(conn, request).await,
            ClientCommand::Echo(payload) => self.echo(conn, payload).await,
            ClientCommand::Broadcast(payload) => self.broadcast_payload(conn, payload).await,
        }
    }

    // ----- event emission -----

    /// Delivers a success event to the audience the policy table names.
    async fn emit(&self, conn: ConnectionId, kind: CommandKind, event: ServerEvent) {
        match audience_for(kind) {
            Audience::Requester => {
                self.connections.unicast(conn, event).await;
            }
            Audience::AllConnections => self.connections.broadcast(event).await,
            Audience::OtherConnections => self.connections.broadcast_except(conn, event).await,
        }
    }

    /// Reports a command failure to the requester only.
    async fn fail(&self, conn: ConnectionId, kind: CommandKind, detalhes: Option<String>) {
        error!(
            connection = %conn,
            command = kind.wire_name(),
            "command failed: {}",
            detalhes.as_deref().unwrap_or(kind.failure_message())
        );
        let envelope = ErrorEnvelope::new(kind.failure_message(), detalhes);
        self.connections
            .unicast(conn, ServerEvent::Error(envelope))
            .await;
    }

    // ----- delivery commands -----

    async fn today_deliveries(&self, conn: ConnectionId) {
        match self.deliveries.find_today().await {
            Ok(list) => {
                self.emit(
                    conn,
                    CommandKind::TodayDeliveries,
                    ServerEvent::TodayDeliveries(list),
                )
                .await;
            }
            Err(_) => self.fail(conn, CommandKind::TodayDeliveries, None).await,
        }
    }

    async fn add_delivery(&self, conn: ConnectionId, delivery: Delivery) {
        let created = match self.deliveries.create(delivery).await {
            Ok(created) => created,
            Err(e) => {
                return self
                    .fail(conn, CommandKind::AddDelivery, Some(e.to_string()))
                    .await;
            }
        };
        info!(
            delivery = created.id.as_deref().unwrap_or("?"),
            "delivery created"
        );
        match self.deliveries.find_today().await {
            Ok(list) => {
                self.emit(
                    conn,
                    CommandKind::AddDelivery,
                    ServerEvent::TodayDeliveries(list),
                )
                .await;
            }
            Err(e) => {
                self.fail(conn, CommandKind::AddDelivery, Some(e.to_string()))
                    .await;
            }
        }
    }

    async fn update_delivery(&self, conn: ConnectionId, delivery: Delivery) {
        let Some(id) = delivery.id.clone() else {
            return self
                .fail(
                    conn,
                    CommandKind::UpdateDelivery,
                    Some("ID da entrega não fornecido. Impossível atualizar.".into()),
                )
                .await;
        };

        match self.deliveries.update_by_id(&id, delivery).await {
            Ok(Some(_)) => {
                info!(delivery = %id, "delivery updated");
                match self.deliveries.find_today().await {
                    Ok(list) => {
                        self.emit(
                            conn,
                            CommandKind::UpdateDelivery,
                            ServerEvent::TodayDeliveries(list),
                        )
                        .await;
                    }
                    Err(e) => {
                        self.fail(conn, CommandKind::UpdateDelivery, Some(e.to_string()))
                            .await;
                    }
                }
            }
            Ok(None) => {
                self.fail(
                    conn,
                    CommandKind::UpdateDelivery,
                    Some(format!("Entrega com ID {id} não encontrada")),
                )
                .await;
            }
            Err(e) => {
                self.fail(conn, CommandKind::UpdateDelivery, Some(e.to_string()))
                    .await;
            }
        }
    }

    async fn delivery_report(&self, conn: ConnectionId) {
        match self.deliveries.find_all().await {
            Ok(list) => {
                self.emit(
                    conn,
                    CommandKind::DeliveryReport,
                    ServerEvent::DeliveryHistory(list),
                )
                .await;
            }
            Err(e) => {
                self.fail(conn, CommandKind::DeliveryReport, Some(e.to_string()))
                    .await;
            }
        }
    }

    // ----- customer commands -----

    async fn fetch_customers(&self, conn: ConnectionId) {
        match self.customers.find_all().await {
            Ok(list) => {
                self.emit(
                    conn,
                    CommandKind::FetchCustomers,
                    ServerEvent::CustomerList(list),
                )
                .await;
            }
            Err(_) => self.fail(conn, CommandKind::FetchCustomers, None).await,
        }
    }

    async fn upsert_customer(&self, conn: ConnectionId, customer: Customer) {
        if customer.name.trim().is_empty() {
            return self
                .fail(
                    conn,
                    CommandKind::UpsertCustomer,
                    Some("Nome do cliente não fornecido. Impossível atualizar/criar.".into()),
                )
                .await;
        }

        if let Err(e) = self.customers.upsert_by_name(customer).await {
            return self
                .fail(conn, CommandKind::UpsertCustomer, Some(e.to_string()))
                .await;
        }

        match self.customers.find_all().await {
            Ok(list) => {
                self.emit(
                    conn,
                    CommandKind::UpsertCustomer,
                    ServerEvent::UpsertedCustomerList(list),
                )
                .await;
            }
            Err(e) => {
                self.fail(conn, CommandKind::UpsertCustomer, Some(e.to_string()))
                    .await;
            }
        }
    }

    // ----- courier commands -----

    async fn fetch_couriers(&self, conn: ConnectionId) {
        match self.couriers.find_all().await {
            Ok(list) => {
                self.emit(
                    conn,
                    CommandKind::FetchCouriers,
                    ServerEvent::CourierList(list),
                )
                .await;
            }
            Err(_) => self.fail(conn, CommandKind::FetchCouriers, None).await,
        }
    }

    async fn authenticate_courier(&self, conn: ConnectionId, request: AuthenticateRequest) {
        // Lookup failure is a normal response, never an error event: the
        // caller cannot distinguish wrong credentials from a missing user.
        let notice = |text: String| {
            ServerEvent::CourierNotIdentified(ServerNotice {
                mensagem_server: text,
            })
        };

        if request.username.trim().is_empty() {
            let event = notice("Erro: Nome de usuário não fornecido".into());
            self.emit(conn, CommandKind::AuthenticateCourier, event).await;
            return;
        }

        match self
            .couriers
            .authenticate_by_username(&request.username)
            .await
        {
            Ok(Some(courier)) => {
                info!(courier = %request.username, "courier identified");
                self.emit(
                    conn,
                    CommandKind::AuthenticateCourier,
                    ServerEvent::CourierIdentified(Box::new(courier)),
                )
                .await;
            }
            Ok(None) => {
                warn!(courier = %request.username, "courier identification failed");
                let event = notice("Não foi possível identificar o usuário".into());
                self.emit(conn, CommandKind::AuthenticateCourier, event).await;
            }
            Err(e) => {
                error!(courier = %request.username, "courier identification errored: {}", e);
                let event = notice(format!("Erro: {e}"));
                self.emit(conn, CommandKind::AuthenticateCourier, event).await;
            }
        }
    }

    async fn locate_courier(&self, conn: ConnectionId, courier: Courier) {
        if courier.username.trim().is_empty() {
            return self
                .fail(
                    conn,
                    CommandKind::LocateCourier,
                    Some("Nome de usuário não fornecido. Impossível atualizar.".into()),
                )
                .await;
        }
        let username = courier.username.clone();

        match self.couriers.update_by_username(courier).await {
            Ok(Some(_)) => {
                info!(courier = %username, "courier location updated");
                match self.couriers.find_all().await {
                    Ok(list) => {
                        self.emit(
                            conn,
                            CommandKind::LocateCourier,
                            ServerEvent::CourierFleet(list),
                        )
                        .await;
                    }
                    Err(e) => {
                        self.fail(conn, CommandKind::LocateCourier, Some(e.to_string()))
                            .await;
                    }
                }
            }
            Ok(None) => {
                self.fail(
                    conn,
                    CommandKind::LocateCourier,
                    Some(format!("Usuário com userName {username} não encontrado.")),
                )
                .await;
            }
            Err(e) => {
                self.fail(conn, CommandKind::LocateCourier, Some(e.to_string()))
                    .await;
            }
        }
    }

    // ----- messaging relay commands -----

    async fn register_relay_interest(&self, conn: ConnectionId) {
        *self.relay_interest.write().await = Some(conn);
    }

    async fn relay_login(&self, conn: ConnectionId) {
        if self.relay.is_authenticated() {
            let event = ServerEvent::RelayStatus(RelayStatusPayload {
                is_authenticated: true,
                error: None,
            });
            self.emit(conn, CommandKind::RelayLogin, event).await;
            return;
        }

        self.register_relay_interest(conn).await;
        match self.relay.initialize().await {
            Ok(()) => {
                let event = ServerEvent::RelayStatus(RelayStatusPayload {
                    is_authenticated: self.relay.is_authenticated(),
                    error: None,
                });
                self.emit(conn, CommandKind::RelayLogin, event).await;
            }
            Err(e) => {
                error!("messaging session initialization failed: {}", e);
                let event = ServerEvent::RelayStatus(RelayStatusPayload {
                    is_authenticated: false,
                    error: Some(e.to_string()),
                });
                self.emit(conn, CommandKind::RelayLogin, event).await;
            }
        }
    }

    async fn relay_status_check(&self, conn: ConnectionId) {
        self.register_relay_interest(conn).await;

        let authenticated = self.relay.is_authenticated();
        let event = ServerEvent::RelayStatus(RelayStatusPayload {
            is_authenticated: authenticated,
            error: None,
        });
        self.emit(conn, CommandKind::RelayStatusCheck, event).await;

        if !authenticated {
            // Kick off re-pairing so the dashboard receives a fresh code.
            let relay = Arc::clone(&self.relay);
            tokio::spawn(async move {
                if let Err(e) = relay.force_re_pairing().await {
                    error!("pairing code generation failed: {}", e);
                }
            });
        }
    }

    async fn relay_force_pairing(&self, conn: ConnectionId) {
        self.register_relay_interest(conn).await;

        if let Err(e) = self.relay.force_re_pairing().await {
            error!("pairing code generation failed: {}", e);
            let event = ServerEvent::RelayStatus(RelayStatusPayload {
                is_authenticated: false,
                error: Some(format!("Falha ao gerar QR code: {e}")),
            });
            self.emit(conn, CommandKind::RelayForcePairing, event).await;
        }
    }

    async fn send_message(&self, conn: ConnectionId, request: SendMessageRequest) {
        let reply = |reply: MessageSendReply| ServerEvent::MessageSendOutcome(reply);

        if request.contato.is_empty() || request.mensagem.is_empty() {
            let event = reply(MessageSendReply::failed(
                "Payload inválido. Os campos \"contato\" e \"mensagem\" são obrigatórios.",
            ));
            self.emit(conn, CommandKind::SendMessage, event).await;
            return;
        }

        if !self.relay.is_authenticated() {
            let event = reply(MessageSendReply::failed(
                "O WhatsApp não está autenticado. Faça login primeiro.",
            ));
            self.emit(conn, CommandKind::SendMessage, event).await;
            return;
        }

        match self
            .relay
            .send_text(&request.contato, &request.mensagem)
            .await
        {
            Ok(Some(receipt)) => {
                info!(to = %receipt.to, "message relayed");
                let event = reply(MessageSendReply::delivered(receipt));
                self.emit(conn, CommandKind::SendMessage, event).await;
            }
            Ok(None) => {
                let event = reply(MessageSendReply::failed(
                    "Não foi possível enviar a mensagem, verifique o formato do contato.",
                ));
                self.emit(conn, CommandKind::SendMessage, event).await;
            }
            Err(e) => {
                error!("message relay failed: {}", e);
                let event = reply(MessageSendReply::failed(format!(
                    "Erro ao enviar mensagem: {e}"
                )));
                self.emit(conn, CommandKind::SendMessage, event).await;
            }
        }
    }

    // ----- generic commands -----

    async fn echo(&self, conn: ConnectionId, payload: serde_json::Value) {
        let event = ServerEvent::Echo(EchoResponse {
            status: "ok".into(),
            message: "Mensagem recebida com sucesso".into(),
            timestamp: now_timestamp(),
            received_data: payload,
        });
        self.emit(conn, CommandKind::Echo, event).await;
    }

    async fn broadcast_payload(&self, conn: ConnectionId, payload: serde_json::Value) {
        let event = ServerEvent::Broadcast(BroadcastPayload {
            from: conn.to_string(),
            timestamp: now_timestamp(),
            data: payload,
        });
        self.emit(conn, CommandKind::Broadcast, event).await;

        self.connections
            .unicast(
                conn,
                ServerEvent::BroadcastConfirmed(BroadcastAck {
                    success: true,
                    timestamp: now_timestamp(),
                }),
            )
            .await;
    }

    // ----- relay session events -----

    /// Forwards asynchronous relay session events to whichever connection
    /// most recently registered interest, if any.
    pub fn spawn_relay_event_pump(self: &Arc<Self>) -> JoinHandle<()> {
        let hub = Arc::clone(self);
        let mut events = hub.relay.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => hub.forward_relay_event(event).await,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "relay event stream lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    async fn forward_relay_event(&self, event: RelaySessionEvent) {
        let Some(conn) = *self.relay_interest.read().await else {
            warn!("relay session event dropped: no interested connection");
            return;
        };

        let event = match event {
            RelaySessionEvent::PairingCode(qr) => ServerEvent::RelayPairingCode { qr },
            RelaySessionEvent::Ready => ServerEvent::RelayStatus(RelayStatusPayload {
                is_authenticated: true,
                error: None,
            }),
            RelaySessionEvent::Disconnected(_) => ServerEvent::RelayStatus(RelayStatusPayload {
                is_authenticated: false,
                error: None,
            }),
            RelaySessionEvent::AuthFailure(message) => {
                ServerEvent::RelayStatus(RelayStatusPayload {
                    is_authenticated: false,
                    error: Some(message),
                })
            }
        };

        self.connections.unicast(conn, event).await;
    }
}
