//! Ports - interfaces the application core depends on.
//!
//! Each port is an async trait implemented by one or more adapters. The hub
//! and the domain services only ever see these traits, never a concrete
//! store or messaging client.

mod courier_repository;
mod credential_verifier;
mod customer_repository;
mod delivery_repository;
mod messaging_relay;

pub use courier_repository::CourierRepository;
pub use credential_verifier::CredentialVerifier;
pub use customer_repository::CustomerRepository;
pub use delivery_repository::DeliveryRepository;
pub use messaging_relay::{MessagingRelay, RelayError, RelayReceipt, RelaySessionEvent};
