//! In-memory implementation of CustomerRepository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Customer, StoreError};
use crate::ports::CustomerRepository;

/// Customer collection held in process memory.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    records: RwLock<HashMap<String, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|record| record.name == name)
            .cloned())
    }

    async fn insert(&self, record: &Customer) -> Result<Customer, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.records.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &Customer,
    ) -> Result<Option<Customer>, StoreError> {
        let mut records = self.records.write().await;
        if !records.contains_key(id) {
            return Ok(None);
        }
        let mut stored = record.clone();
        // The store key is authoritative; any payload id was already stripped.
        stored.id = Some(id.to_string());
        records.insert(id.to_string(), stored.clone());
        Ok(Some(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_an_id() {
        let repo = InMemoryCustomerRepository::new();
        let stored = repo.insert(&Customer::named("Ana")).await.unwrap();
        assert!(stored.id.is_some());
    }

    #[tokio::test]
    async fn find_by_name_matches_exactly() {
        let repo = InMemoryCustomerRepository::new();
        repo.insert(&Customer::named("Ana")).await.unwrap();

        assert!(repo.find_by_name("Ana").await.unwrap().is_some());
        assert!(repo.find_by_name("ana").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_preserves_the_store_key() {
        let repo = InMemoryCustomerRepository::new();
        let stored = repo.insert(&Customer::named("Ana")).await.unwrap();
        let id = stored.id.unwrap();

        let mut replacement = Customer::named("Ana");
        replacement.phone = Some("111".into());

        let updated = repo.update_by_id(&id, &replacement).await.unwrap().unwrap();
        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(updated.phone.as_deref(), Some("111"));
    }

    #[tokio::test]
    async fn update_of_unknown_id_returns_none() {
        let repo = InMemoryCustomerRepository::new();
        let result = repo
            .update_by_id("missing", &Customer::named("Ana"))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
