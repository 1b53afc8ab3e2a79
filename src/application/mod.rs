//! Application services - one per record kind.
//!
//! Each service is a thin translation layer between the hub and a record
//! store port: it applies the record-level defaults the store contract
//! requires (date markers, id stripping) and nothing else. Wire-facing
//! validation belongs to the hub.

mod courier_service;
mod customer_service;
mod delivery_service;

pub use courier_service::CourierService;
pub use customer_service::CustomerService;
pub use delivery_service::DeliveryService;
