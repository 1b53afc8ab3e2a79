//! Delivery repository port.

use async_trait::async_trait;

use crate::domain::{Delivery, StoreError};

/// Record store operations for the delivery collection.
///
/// Day markers are matched component-wise: `find_by_day(&[14, 6, 2025])`
/// returns exactly the deliveries whose stored marker equals that array.
/// Implementations enforce the store-layer structural contract on the time
/// marker (exactly two elements or absent) for both inserts and updates.
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Fetch the deliveries whose day marker equals `day`.
    async fn find_by_day(&self, day: &[i32]) -> Result<Vec<Delivery>, StoreError>;

    /// Fetch the full delivery history, unfiltered by date.
    async fn find_all(&self) -> Result<Vec<Delivery>, StoreError>;

    /// Insert a new delivery; the store assigns the identifier.
    async fn insert(&self, record: &Delivery) -> Result<Delivery, StoreError>;

    /// Replace the delivery stored under `id`. Returns the updated record,
    /// or `None` when no such delivery exists.
    async fn update_by_id(&self, id: &str, record: &Delivery)
        -> Result<Option<Delivery>, StoreError>;

    /// Delete the delivery stored under `id`. Returns whether a record was
    /// actually removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DeliveryRepository) {}
    }
}
