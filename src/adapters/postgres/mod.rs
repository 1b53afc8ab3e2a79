//! PostgreSQL implementations of the record store ports.
//!
//! Each repository maps rows to the public record shapes, promoting the
//! store-assigned `id` column and splitting coordinates into latitude and
//! longitude columns. A payload `id` is structurally incapable of being
//! persisted: update statements never touch the id column.

mod courier_repository;
mod customer_repository;
mod delivery_repository;

pub use courier_repository::PostgresCourierRepository;
pub use customer_repository::PostgresCustomerRepository;
pub use delivery_repository::PostgresDeliveryRepository;

use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::{Coordinates, StoreError};

/// Reads the optional latitude/longitude column pair into coordinates.
fn read_coordinates(row: &PgRow) -> Result<Option<Coordinates>, sqlx::Error> {
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;
    Ok(match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    })
}

/// Parses a routing id; a malformed id is a store-layer rejection.
fn parse_record_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id)
        .map_err(|_| StoreError::InvalidRecord(format!("malformed record id {id:?}")))
}
