//! Domain records for the dispatch operation.
//!
//! These are the public shapes that travel over the wire and in and out of
//! the record store: customers, deliveries, and couriers. Store-internal
//! bookkeeping never appears here; repository adapters translate documents
//! into these records, promoting the store-assigned identifier to `id`.

mod courier;
mod customer;
mod delivery;
mod errors;
mod geo;

pub use courier::{Courier, CourierStatus};
pub use customer::Customer;
pub use delivery::{today_marker, Delivery};
pub use errors::StoreError;
pub use geo::Coordinates;
