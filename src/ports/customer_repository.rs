//! Customer repository port.

use async_trait::async_trait;

use crate::domain::{Customer, StoreError};

/// Record store operations for the customer collection.
///
/// Implementations translate store documents into [`Customer`] records,
/// promoting the store-assigned identifier to `id` and discarding
/// store-internal fields. The `id` field on a record passed to
/// `update_by_id` is never persisted; the routing key is the separate `id`
/// argument.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Fetch every customer in the collection.
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError>;

    /// Look up a customer by its natural key. Returns `None` if absent.
    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, StoreError>;

    /// Insert a new customer; the store assigns the identifier.
    async fn insert(&self, record: &Customer) -> Result<Customer, StoreError>;

    /// Replace the customer stored under `id`. Returns the updated record,
    /// or `None` when no such customer exists.
    async fn update_by_id(&self, id: &str, record: &Customer)
        -> Result<Option<Customer>, StoreError>;
}
