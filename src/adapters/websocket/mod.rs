//! The realtime session hub and its WebSocket transport.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        axum /ws handler                      │
//! │        one socket task pair per dashboard connection         │
//! └──────────────────────────────────────────────────────────────┘
//!                │ inbound frames            ▲ outbound events
//!                ▼                           │
//! ┌──────────────────────────────────────────────────────────────┐
//! │                             Hub                              │
//! │   command parsing → validation → domain services → policy    │
//! │   table → unicast/broadcast via the connection registry      │
//! └──────────────────────────────────────────────────────────────┘
//!                │                           ▲
//!                ▼                           │ session events
//! ┌──────────────────────┐      ┌────────────────────────────────┐
//! │   domain services    │      │        messaging relay         │
//! │  (record store I/O)  │      │  (forwarded to the interested  │
//! └──────────────────────┘      │          connection)           │
//!                               └────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`commands`] - inbound wire protocol, one tagged variant per command
//! - [`events`] - outbound wire protocol and the uniform error envelope
//! - [`policy`] - the declarative broadcast-vs-unicast audience table
//! - [`connections`] - the live connection registry
//! - [`hub`] - command dispatch and relay-event forwarding
//! - [`handler`] - the axum upgrade handler and socket loop

pub mod commands;
pub mod connections;
pub mod events;
pub mod handler;
pub mod hub;
pub mod policy;

pub use commands::{ClientCommand, CommandKind, InboundFrame};
pub use connections::{ConnectionId, ConnectionRegistry};
pub use events::{ErrorEnvelope, ServerEvent};
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use hub::Hub;
pub use policy::{audience_for, Audience};
