//! In-memory adapters for testing and development.
//!
//! These hold records in process memory with the same contracts as the
//! PostgreSQL repositories: store-assigned identifiers, id stripping on
//! update, and the structural time-marker check on deliveries.

mod courier_repository;
mod customer_repository;
mod delivery_repository;
mod relay;

pub use courier_repository::InMemoryCourierRepository;
pub use customer_repository::InMemoryCustomerRepository;
pub use delivery_repository::InMemoryDeliveryRepository;
pub use relay::InMemoryRelay;
