//! In-memory implementation of DeliveryRepository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Delivery, StoreError};
use crate::ports::DeliveryRepository;

/// Delivery collection held in process memory.
#[derive(Default)]
pub struct InMemoryDeliveryRepository {
    records: RwLock<HashMap<String, Delivery>>,
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn find_by_day(&self, day: &[i32]) -> Result<Vec<Delivery>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.day.as_deref() == Some(day))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Delivery>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn insert(&self, record: &Delivery) -> Result<Delivery, StoreError> {
        record.validate_for_store()?;
        let id = Uuid::new_v4().to_string();
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.records.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &Delivery,
    ) -> Result<Option<Delivery>, StoreError> {
        record.validate_for_store()?;
        let mut records = self.records.write().await;
        if !records.contains_key(id) {
            return Ok(None);
        }
        let mut stored = record.clone();
        stored.id = Some(id.to_string());
        records.insert(id.to_string(), stored.clone());
        Ok(Some(stored))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::today_marker;

    fn on_day(name: &str, day: Vec<i32>) -> Delivery {
        Delivery {
            name: Some(name.into()),
            day: Some(day),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn find_by_day_matches_component_wise() {
        let repo = InMemoryDeliveryRepository::new();
        repo.insert(&on_day("hoje", today_marker())).await.unwrap();
        repo.insert(&on_day("antiga", vec![1, 1, 2020]))
            .await
            .unwrap();

        let today = repo.find_by_day(&today_marker()).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name.as_deref(), Some("hoje"));
    }

    #[tokio::test]
    async fn insert_rejects_malformed_time_marker() {
        let repo = InMemoryDeliveryRepository::new();
        let mut record = on_day("Ana", today_marker());
        record.time_of_day = Some(vec![9, 30, 0]);
        assert!(matches!(
            repo.insert(&record).await,
            Err(StoreError::InvalidRecord(_))
        ));
    }

    #[tokio::test]
    async fn update_rejects_malformed_time_marker() {
        let repo = InMemoryDeliveryRepository::new();
        let stored = repo.insert(&on_day("Ana", today_marker())).await.unwrap();
        let id = stored.id.unwrap();

        let mut replacement = on_day("Ana", today_marker());
        replacement.time_of_day = Some(vec![9]);
        assert!(matches!(
            repo.update_by_id(&id, &replacement).await,
            Err(StoreError::InvalidRecord(_))
        ));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_record_was_removed() {
        let repo = InMemoryDeliveryRepository::new();
        let stored = repo.insert(&on_day("Ana", today_marker())).await.unwrap();
        let id = stored.id.unwrap();

        assert!(repo.delete_by_id(&id).await.unwrap());
        assert!(!repo.delete_by_id(&id).await.unwrap());
    }
}
