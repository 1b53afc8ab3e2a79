//! Courier repository port.

use async_trait::async_trait;

use crate::domain::{Courier, StoreError};

/// Record store operations for the courier collection.
///
/// `username` is the natural key; store identifiers only appear when a
/// record round-trips through the store.
#[async_trait]
pub trait CourierRepository: Send + Sync {
    /// Fetch every courier in the collection.
    async fn find_all(&self) -> Result<Vec<Courier>, StoreError>;

    /// Look up a courier by username. Returns `None` if absent.
    async fn find_by_username(&self, username: &str) -> Result<Option<Courier>, StoreError>;

    /// Insert a new courier; the store assigns the identifier.
    async fn insert(&self, record: &Courier) -> Result<Courier, StoreError>;

    /// Replace the courier stored under `id`. Returns the updated record,
    /// or `None` when no such courier exists.
    async fn update_by_id(&self, id: &str, record: &Courier)
        -> Result<Option<Courier>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CourierRepository) {}
    }
}
