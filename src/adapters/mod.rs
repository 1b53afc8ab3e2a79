//! Adapters - concrete implementations of the ports.
//!
//! - [`postgres`] - record store repositories backed by PostgreSQL
//! - [`memory`] - in-process repositories and relay for testing/development
//! - [`relay`] - messaging relay backed by an external automation bridge
//! - [`auth`] - credential verification
//! - [`websocket`] - the realtime session hub and its transport

pub mod auth;
pub mod memory;
pub mod postgres;
pub mod relay;
pub mod websocket;
