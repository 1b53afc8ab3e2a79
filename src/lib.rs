//! Despacho - Real-Time Delivery Dispatch Backend
//!
//! Tracks daily deliveries, customer records, and courier status/location,
//! broadcasting state to connected dashboards over persistent WebSocket
//! connections and optionally relaying outbound text messages through an
//! external messaging bridge.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
