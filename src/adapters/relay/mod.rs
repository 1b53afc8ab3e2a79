//! Messaging relay adapters.
//!
//! The production relay is a call-through to an external automation bridge
//! over HTTP; the address-formatting contract lives here so every relay
//! implementation applies the same rules before a message leaves the
//! process.

mod address;
mod bridge;

pub use address::format_address;
pub use bridge::HttpBridgeRelay;
