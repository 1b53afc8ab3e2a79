//! Inbound commands - the client half of the wire protocol.
//!
//! A client frame is JSON `{ "event": <name>, "data": <payload> }`. Frames
//! are decoded into one tagged variant per command, each with its own
//! payload contract, so a malformed payload is rejected before any state is
//! touched.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Courier, Customer, Delivery};

/// A decoded inbound frame, not yet matched to a command.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Credentials presented on `Autenticar Usuario`.
///
/// Only the username participates in identification; the password field is
/// accepted for wire compatibility but not checked.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateRequest {
    #[serde(rename = "userName")]
    pub username: String,
    #[serde(rename = "senha", default)]
    pub password: Option<String>,
}

/// Payload of `Enviar Mensagem`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub contato: String,
    #[serde(default)]
    pub mensagem: String,
}

/// Every command a client can issue, one variant per wire event name.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    /// `Entregas do Dia`
    TodayDeliveries,
    /// `Buscar Clientes`
    FetchCustomers,
    /// `Buscar Usuarios`
    FetchCouriers,
    /// `Adicionar Entrega`
    AddDelivery(Box<Delivery>),
    /// `Atualizar Entrega`
    UpdateDelivery(Box<Delivery>),
    /// `Atualizar Cliente`
    UpsertCustomer(Box<Customer>),
    /// `Autenticar Usuario`
    AuthenticateCourier(AuthenticateRequest),
    /// `Localizar Entregador`
    LocateCourier(Box<Courier>),
    /// `Relatorio Entregas`
    DeliveryReport,
    /// `whatsapp-login`
    RelayLogin,
    /// `verificar-whatsapp-status`
    RelayStatusCheck,
    /// `forcar-whatsapp-qr`
    RelayForcePairing,
    /// `Enviar Mensagem`
    SendMessage(SendMessageRequest),
    /// generic `message`
    Echo(Value),
    /// generic `broadcast`
    Broadcast(Value),
}

/// Fieldless mirror of [`ClientCommand`], used by the broadcast policy table
/// and the error reporting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    TodayDeliveries,
    FetchCustomers,
    FetchCouriers,
    AddDelivery,
    UpdateDelivery,
    UpsertCustomer,
    AuthenticateCourier,
    LocateCourier,
    DeliveryReport,
    RelayLogin,
    RelayStatusCheck,
    RelayForcePairing,
    SendMessage,
    Echo,
    Broadcast,
}

impl CommandKind {
    /// Every command, in wire-surface order.
    pub const ALL: [CommandKind; 15] = [
        CommandKind::TodayDeliveries,
        CommandKind::FetchCustomers,
        CommandKind::FetchCouriers,
        CommandKind::AddDelivery,
        CommandKind::UpdateDelivery,
        CommandKind::UpsertCustomer,
        CommandKind::AuthenticateCourier,
        CommandKind::LocateCourier,
        CommandKind::DeliveryReport,
        CommandKind::RelayLogin,
        CommandKind::RelayStatusCheck,
        CommandKind::RelayForcePairing,
        CommandKind::SendMessage,
        CommandKind::Echo,
        CommandKind::Broadcast,
    ];

    /// The wire event name this command is issued under.
    pub const fn wire_name(self) -> &'static str {
        match self {
            CommandKind::TodayDeliveries => "Entregas do Dia",
            CommandKind::FetchCustomers => "Buscar Clientes",
            CommandKind::FetchCouriers => "Buscar Usuarios",
            CommandKind::AddDelivery => "Adicionar Entrega",
            CommandKind::UpdateDelivery => "Atualizar Entrega",
            CommandKind::UpsertCustomer => "Atualizar Cliente",
            CommandKind::AuthenticateCourier => "Autenticar Usuario",
            CommandKind::LocateCourier => "Localizar Entregador",
            CommandKind::DeliveryReport => "Relatorio Entregas",
            CommandKind::RelayLogin => "whatsapp-login",
            CommandKind::RelayStatusCheck => "verificar-whatsapp-status",
            CommandKind::RelayForcePairing => "forcar-whatsapp-qr",
            CommandKind::SendMessage => "Enviar Mensagem",
            CommandKind::Echo => "message",
            CommandKind::Broadcast => "broadcast",
        }
    }

    /// The user-facing message carried by this command's error envelope.
    pub const fn failure_message(self) -> &'static str {
        match self {
            CommandKind::TodayDeliveries => "Erro ao buscar entregas do dia",
            CommandKind::FetchCustomers => "Erro ao buscar clientes",
            CommandKind::FetchCouriers => "Erro ao buscar usuários",
            CommandKind::AddDelivery => "Erro ao adicionar entrega",
            CommandKind::UpdateDelivery => "Erro ao atualizar entrega",
            CommandKind::UpsertCustomer => "Erro ao atualizar/criar cliente",
            CommandKind::AuthenticateCourier => "Erro ao autenticar usuário",
            CommandKind::LocateCourier => "Erro ao atualizar entregador",
            CommandKind::DeliveryReport => "Erro ao buscar relatório de entregas",
            CommandKind::RelayLogin => "Erro ao iniciar sessão de mensagens",
            CommandKind::RelayStatusCheck => "Erro ao verificar sessão de mensagens",
            CommandKind::RelayForcePairing => "Erro ao gerar novo código de pareamento",
            CommandKind::SendMessage => "Erro ao enviar mensagem",
            CommandKind::Echo => "Erro ao processar mensagem",
            CommandKind::Broadcast => "Erro ao transmitir mensagem",
        }
    }
}

/// Why a frame could not be turned into a command.
#[derive(Debug)]
pub enum CommandParseError {
    /// The event name is not part of the wire surface.
    UnknownEvent(String),
    /// The event name is known but the payload violates its contract.
    InvalidPayload {
        kind: CommandKind,
        detail: String,
    },
}

impl ClientCommand {
    /// Matches a decoded frame to a command, validating the payload shape.
    pub fn from_frame(frame: InboundFrame) -> Result<Self, CommandParseError> {
        fn payload<T: serde::de::DeserializeOwned>(
            kind: CommandKind,
            data: Value,
        ) -> Result<T, CommandParseError> {
            serde_json::from_value(data).map_err(|e| CommandParseError::InvalidPayload {
                kind,
                detail: e.to_string(),
            })
        }

        match frame.event.as_str() {
            "Entregas do Dia" => Ok(ClientCommand::TodayDeliveries),
            "Buscar Clientes" => Ok(ClientCommand::FetchCustomers),
            "Buscar Usuarios" => Ok(ClientCommand::FetchCouriers),
            "Adicionar Entrega" => {
                payload(CommandKind::AddDelivery, frame.data).map(ClientCommand::AddDelivery)
            }
            "Atualizar Entrega" => {
                payload(CommandKind::UpdateDelivery, frame.data).map(ClientCommand::UpdateDelivery)
            }
            "Atualizar Cliente" => {
                payload(CommandKind::UpsertCustomer, frame.data).map(ClientCommand::UpsertCustomer)
            }
            "Autenticar Usuario" => payload(CommandKind::AuthenticateCourier, frame.data)
                .map(ClientCommand::AuthenticateCourier),
            "Localizar Entregador" => {
                payload(CommandKind::LocateCourier, frame.data).map(ClientCommand::LocateCourier)
            }
            "Relatorio Entregas" => Ok(ClientCommand::DeliveryReport),
            "whatsapp-login" => Ok(ClientCommand::RelayLogin),
            "verificar-whatsapp-status" => Ok(ClientCommand::RelayStatusCheck),
            "forcar-whatsapp-qr" => Ok(ClientCommand::RelayForcePairing),
            "Enviar Mensagem" => {
                payload(CommandKind::SendMessage, frame.data).map(ClientCommand::SendMessage)
            }
            "message" => Ok(ClientCommand::Echo(frame.data)),
            "broadcast" => Ok(ClientCommand::Broadcast(frame.data)),
            _ => Err(CommandParseError::UnknownEvent(frame.event)),
        }
    }

    /// This command's fieldless kind.
    pub fn kind(&self) -> CommandKind {
        match self {
            ClientCommand::TodayDeliveries => CommandKind::TodayDeliveries,
            ClientCommand::FetchCustomers => CommandKind::FetchCustomers,
            ClientCommand::FetchCouriers => CommandKind::FetchCouriers,
            ClientCommand::AddDelivery(_) => CommandKind::AddDelivery,
            ClientCommand::UpdateDelivery(_) => CommandKind::UpdateDelivery,
            ClientCommand::UpsertCustomer(_) => CommandKind::UpsertCustomer,
            ClientCommand::AuthenticateCourier(_) => CommandKind::AuthenticateCourier,
            ClientCommand::LocateCourier(_) => CommandKind::LocateCourier,
            ClientCommand::DeliveryReport => CommandKind::DeliveryReport,
            ClientCommand::RelayLogin => CommandKind::RelayLogin,
            ClientCommand::RelayStatusCheck => CommandKind::RelayStatusCheck,
            ClientCommand::RelayForcePairing => CommandKind::RelayForcePairing,
            ClientCommand::SendMessage(_) => CommandKind::SendMessage,
            ClientCommand::Echo(_) => CommandKind::Echo,
            ClientCommand::Broadcast(_) => CommandKind::Broadcast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: Value) -> InboundFrame {
        InboundFrame {
            event: event.into(),
            data,
        }
    }

    #[test]
    fn parses_payloadless_commands() {
        let cmd = ClientCommand::from_frame(frame("Entregas do Dia", Value::Null)).unwrap();
        assert!(matches!(cmd, ClientCommand::TodayDeliveries));
    }

    #[test]
    fn parses_delivery_payload() {
        let data = serde_json::json!({ "nome": "Ana", "valor": "45.00" });
        let cmd = ClientCommand::from_frame(frame("Adicionar Entrega", data)).unwrap();
        let ClientCommand::AddDelivery(delivery) = cmd else {
            panic!("wrong variant");
        };
        assert_eq!(delivery.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn rejects_customer_payload_without_name() {
        let data = serde_json::json!({ "telefone": "111" });
        let err = ClientCommand::from_frame(frame("Atualizar Cliente", data)).unwrap_err();
        assert!(matches!(
            err,
            CommandParseError::InvalidPayload {
                kind: CommandKind::UpsertCustomer,
                ..
            }
        ));
    }

    #[test]
    fn rejects_locate_payload_without_username() {
        let data = serde_json::json!({ "nome": "Carlos" });
        let err = ClientCommand::from_frame(frame("Localizar Entregador", data)).unwrap_err();
        assert!(matches!(
            err,
            CommandParseError::InvalidPayload {
                kind: CommandKind::LocateCourier,
                ..
            }
        ));
    }

    #[test]
    fn unknown_event_is_reported_by_name() {
        let err = ClientCommand::from_frame(frame("Comando Misterioso", Value::Null)).unwrap_err();
        let CommandParseError::UnknownEvent(name) = err else {
            panic!("wrong error");
        };
        assert_eq!(name, "Comando Misterioso");
    }

    #[test]
    fn authenticate_accepts_password_but_does_not_require_it() {
        let with = serde_json::json!({ "userName": "carlos.m", "senha": "x" });
        let without = serde_json::json!({ "userName": "carlos.m" });
        assert!(ClientCommand::from_frame(frame("Autenticar Usuario", with)).is_ok());
        assert!(ClientCommand::from_frame(frame("Autenticar Usuario", without)).is_ok());
    }

    #[test]
    fn every_kind_has_a_wire_name_and_failure_message() {
        for kind in CommandKind::ALL {
            assert!(!kind.wire_name().is_empty());
            assert!(!kind.failure_message().is_empty());
        }
    }

    #[test]
    fn generic_commands_accept_arbitrary_payloads() {
        let data = serde_json::json!({ "qualquer": ["coisa", 1] });
        let cmd = ClientCommand::from_frame(frame("message", data.clone())).unwrap();
        assert!(matches!(cmd, ClientCommand::Echo(v) if v == data));
    }
}
