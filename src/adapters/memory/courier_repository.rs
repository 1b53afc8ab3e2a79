//! In-memory implementation of CourierRepository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Courier, StoreError};
use crate::ports::CourierRepository;

/// Courier collection held in process memory.
#[derive(Default)]
pub struct InMemoryCourierRepository {
    records: RwLock<HashMap<String, Courier>>,
}

impl InMemoryCourierRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourierRepository for InMemoryCourierRepository {
    async fn find_all(&self) -> Result<Vec<Courier>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Courier>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|record| record.username == username)
            .cloned())
    }

    async fn insert(&self, record: &Courier) -> Result<Courier, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.records.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &Courier,
    ) -> Result<Option<Courier>, StoreError> {
        let mut records = self.records.write().await;
        if !records.contains_key(id) {
            return Ok(None);
        }
        let mut stored = record.clone();
        stored.id = Some(id.to_string());
        records.insert(id.to_string(), stored.clone());
        Ok(Some(stored))
    }
}
