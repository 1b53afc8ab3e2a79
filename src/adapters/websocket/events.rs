//! Outbound events - the server half of the wire protocol.
//!
//! Every event travels as a JSON frame `{ "event": <name>, "data": <payload> }`.
//! Event names are the ones the dashboard clients listen for, several of
//! which mirror the command that produced them.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{Courier, Customer, Delivery};
use crate::ports::RelayReceipt;

/// Uniform error envelope sent on the `error` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<String>,
    pub timestamp: String,
}

impl ErrorEnvelope {
    /// An envelope stamped with the current time.
    pub fn new(message: impl Into<String>, detalhes: Option<String>) -> Self {
        Self {
            message: message.into(),
            detalhes,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Acknowledgement for the generic echo command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub received_data: Value,
}

/// Payload relayed to the other connections by the generic broadcast command.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastPayload {
    pub from: String,
    pub timestamp: String,
    pub data: Value,
}

/// Confirmation sent back to the broadcaster.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastAck {
    pub success: bool,
    pub timestamp: String,
}

/// Messaging session status pushed on `whatsapp-status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStatusPayload {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of an outbound message relay attempt.
#[derive(Debug, Clone, Serialize)]
pub struct MessageSendReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RelayReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageSendReply {
    pub fn delivered(receipt: RelayReceipt) -> Self {
        Self {
            success: true,
            message: Some("Mensagem enviada com sucesso".into()),
            result: Some(receipt),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Server-to-caller notice carried inside an otherwise successful response
/// (the "could not identify" path of courier authentication).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerNotice {
    pub mensagem_server: String,
}

/// Every event the hub can emit.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// `Entregas do Dia` - today's delivery collection.
    TodayDeliveries(Vec<Delivery>),
    /// `Buscar Clientes` - the full customer collection.
    CustomerList(Vec<Customer>),
    /// `Buscar Usuarios` - the full courier collection.
    CourierList(Vec<Courier>),
    /// `Atualizar Cliente` - customer collection after an upsert.
    UpsertedCustomerList(Vec<Customer>),
    /// `Autenticar Usuario` - the matched courier record.
    CourierIdentified(Box<Courier>),
    /// `Autenticar Usuario` - lookup failed; carried as a notice, not an error.
    CourierNotIdentified(ServerNotice),
    /// `Atualizando todos entregadores` - courier collection after a location update.
    CourierFleet(Vec<Courier>),
    /// `Relatorio Entregas` - the unfiltered delivery history.
    DeliveryHistory(Vec<Delivery>),
    /// `whatsapp-status`.
    RelayStatus(RelayStatusPayload),
    /// `whatsapp-qr`.
    RelayPairingCode { qr: String },
    /// `Enviar Mensagem Resposta`.
    MessageSendOutcome(MessageSendReply),
    /// `response` - echo acknowledgement.
    Echo(EchoResponse),
    /// `broadcast` - relayed payload.
    Broadcast(BroadcastPayload),
    /// `broadcastSent` - broadcaster confirmation.
    BroadcastConfirmed(BroadcastAck),
    /// `error` - uniform failure envelope.
    Error(ErrorEnvelope),
}

impl ServerEvent {
    /// The wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::TodayDeliveries(_) => "Entregas do Dia",
            ServerEvent::CustomerList(_) => "Buscar Clientes",
            ServerEvent::CourierList(_) => "Buscar Usuarios",
            ServerEvent::UpsertedCustomerList(_) => "Atualizar Cliente",
            ServerEvent::CourierIdentified(_) | ServerEvent::CourierNotIdentified(_) => {
                "Autenticar Usuario"
            }
            ServerEvent::CourierFleet(_) => "Atualizando todos entregadores",
            ServerEvent::DeliveryHistory(_) => "Relatorio Entregas",
            ServerEvent::RelayStatus(_) => "whatsapp-status",
            ServerEvent::RelayPairingCode { .. } => "whatsapp-qr",
            ServerEvent::MessageSendOutcome(_) => "Enviar Mensagem Resposta",
            ServerEvent::Echo(_) => "response",
            ServerEvent::Broadcast(_) => "broadcast",
            ServerEvent::BroadcastConfirmed(_) => "broadcastSent",
            ServerEvent::Error(_) => "error",
        }
    }

    fn data(&self) -> Value {
        fn json<T: Serialize>(payload: &T) -> Value {
            serde_json::to_value(payload).expect("event payload serialization cannot fail")
        }

        match self {
            ServerEvent::TodayDeliveries(list) | ServerEvent::DeliveryHistory(list) => json(list),
            ServerEvent::CustomerList(list) | ServerEvent::UpsertedCustomerList(list) => json(list),
            ServerEvent::CourierList(list) | ServerEvent::CourierFleet(list) => json(list),
            ServerEvent::CourierIdentified(courier) => json(courier),
            ServerEvent::CourierNotIdentified(notice) => json(notice),
            ServerEvent::RelayStatus(status) => json(status),
            ServerEvent::RelayPairingCode { qr } => serde_json::json!({ "qr": qr }),
            ServerEvent::MessageSendOutcome(reply) => json(reply),
            ServerEvent::Echo(echo) => json(echo),
            ServerEvent::Broadcast(payload) => json(payload),
            ServerEvent::BroadcastConfirmed(ack) => json(ack),
            ServerEvent::Error(envelope) => json(envelope),
        }
    }

    /// The complete wire frame for this event.
    pub fn to_frame(&self) -> Value {
        serde_json::json!({ "event": self.name(), "data": self.data() })
    }

    /// The frame serialized for the transport.
    pub fn to_message(&self) -> String {
        self.to_frame().to_string()
    }
}

/// The current time in the ISO-8601 shape the envelopes carry.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}
