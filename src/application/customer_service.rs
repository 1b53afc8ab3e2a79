//! Customer service.

use std::sync::Arc;

use crate::domain::{Customer, StoreError};
use crate::ports::CustomerRepository;

/// Customer operations over the record store.
#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    /// All customers in the collection.
    pub async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        self.repository.find_all().await
    }

    /// Look up a customer by its natural key.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, StoreError> {
        self.repository.find_by_name(name).await
    }

    /// Insert a new customer.
    pub async fn create(&self, record: Customer) -> Result<Customer, StoreError> {
        self.repository.insert(&record).await
    }

    /// Replace the customer stored under `id`, never persisting a payload
    /// `id` field. Returns `None` when the target does not exist.
    pub async fn update_by_id(
        &self,
        id: &str,
        mut record: Customer,
    ) -> Result<Option<Customer>, StoreError> {
        record.id = None;
        self.repository.update_by_id(id, &record).await
    }

    /// Update the customer with this name, or create it if absent.
    ///
    /// A single logical operation from the caller's perspective: the result
    /// is always a valid stored customer, whichever branch ran. Upserting
    /// the same name twice leaves exactly one record.
    pub async fn upsert_by_name(&self, mut record: Customer) -> Result<Customer, StoreError> {
        match self.repository.find_by_name(&record.name).await? {
            Some(existing) => {
                record.id = None;
                match existing.id.as_deref() {
                    Some(id) => match self.repository.update_by_id(id, &record).await? {
                        Some(updated) => Ok(updated),
                        // The record vanished between lookup and update.
                        None => self.repository.insert(&record).await,
                    },
                    None => self.repository.insert(&record).await,
                }
            }
            None => self.repository.insert(&record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCustomerRepository;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(InMemoryCustomerRepository::new()))
    }

    #[tokio::test]
    async fn upsert_creates_when_name_is_new() {
        let service = service();

        let stored = service
            .upsert_by_name(Customer::named("Bruno"))
            .await
            .unwrap();

        assert!(stored.id.is_some());
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_record_with_latest_fields() {
        let service = service();

        let mut first = Customer::named("Bruno");
        first.phone = Some("111".into());
        let stored_first = service.upsert_by_name(first).await.unwrap();

        let mut second = Customer::named("Bruno");
        second.phone = Some("222".into());
        let stored_second = service.upsert_by_name(second).await.unwrap();

        let all = service.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].phone.as_deref(), Some("222"));
        assert_eq!(stored_first.id, stored_second.id);
    }

    #[tokio::test]
    async fn upsert_never_persists_a_payload_id() {
        let service = service();
        let stored = service
            .upsert_by_name(Customer::named("Bruno"))
            .await
            .unwrap();

        let mut payload = Customer::named("Bruno");
        payload.id = Some("forged-id".into());
        let updated = service.upsert_by_name(payload).await.unwrap();

        assert_eq!(updated.id, stored.id);
    }

    #[tokio::test]
    async fn update_by_id_strips_payload_id() {
        let service = service();
        let stored = service.create(Customer::named("Ana")).await.unwrap();
        let id = stored.id.clone().unwrap();

        let mut payload = Customer::named("Ana");
        payload.id = Some("other-id".into());
        payload.phone = Some("333".into());

        let updated = service.update_by_id(&id, payload).await.unwrap().unwrap();
        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(updated.phone.as_deref(), Some("333"));
    }

    #[tokio::test]
    async fn update_by_id_reports_missing_target() {
        let service = service();
        let result = service
            .update_by_id("does-not-exist", Customer::named("Ana"))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
