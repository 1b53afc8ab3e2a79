//! Delivery service.

use std::sync::Arc;

use crate::domain::{today_marker, Delivery, StoreError};
use crate::ports::DeliveryRepository;

/// Delivery operations over the record store.
#[derive(Clone)]
pub struct DeliveryService {
    repository: Arc<dyn DeliveryRepository>,
}

impl DeliveryService {
    pub fn new(repository: Arc<dyn DeliveryRepository>) -> Self {
        Self { repository }
    }

    /// The deliveries whose day marker equals today's `[day, month, year]`.
    pub async fn find_today(&self) -> Result<Vec<Delivery>, StoreError> {
        self.repository.find_by_day(&today_marker()).await
    }

    /// The full delivery history, unfiltered by date.
    pub async fn find_all(&self) -> Result<Vec<Delivery>, StoreError> {
        self.repository.find_all().await
    }

    /// Insert a new delivery. An absent or malformed day marker is replaced
    /// with today's date before the record reaches the store.
    pub async fn create(&self, mut record: Delivery) -> Result<Delivery, StoreError> {
        record.normalize_day_marker();
        self.repository.insert(&record).await
    }

    /// Replace the delivery stored under `id`, never persisting a payload
    /// `id` field. Returns `None` when the target does not exist.
    pub async fn update_by_id(
        &self,
        id: &str,
        mut record: Delivery,
    ) -> Result<Option<Delivery>, StoreError> {
        record.id = None;
        self.repository.update_by_id(id, &record).await
    }

    /// Delete the delivery stored under `id`. Returns whether a record was
    /// removed.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.repository.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDeliveryRepository;

    fn service() -> DeliveryService {
        DeliveryService::new(Arc::new(InMemoryDeliveryRepository::new()))
    }

    fn named(name: &str) -> Delivery {
        Delivery {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_defaults_absent_day_marker_to_today() {
        let service = service();
        let stored = service.create(named("Ana")).await.unwrap();
        assert_eq!(stored.day, Some(today_marker()));
    }

    #[tokio::test]
    async fn create_defaults_malformed_day_marker_to_today() {
        let service = service();
        let mut record = named("Ana");
        record.day = Some(vec![14, 6]);
        let stored = service.create(record).await.unwrap();
        assert_eq!(stored.day, Some(today_marker()));
    }

    #[tokio::test]
    async fn create_preserves_explicit_day_marker() {
        let service = service();
        let mut record = named("Ana");
        record.day = Some(vec![1, 1, 2020]);
        let stored = service.create(record).await.unwrap();
        assert_eq!(stored.day, Some(vec![1, 1, 2020]));
    }

    #[tokio::test]
    async fn find_today_matches_marker_component_wise() {
        let service = service();
        service.create(named("hoje")).await.unwrap();

        let mut past = named("antiga");
        past.day = Some(vec![1, 1, 2020]);
        service.create(past).await.unwrap();

        let today = service.find_today().await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name.as_deref(), Some("hoje"));

        let all = service.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_by_id_strips_payload_id() {
        let service = service();
        let stored = service.create(named("Ana")).await.unwrap();
        let id = stored.id.clone().unwrap();

        let mut payload = named("Ana");
        payload.id = Some("forged".into());
        payload.status = Some("em rota".into());

        let updated = service.update_by_id(&id, payload).await.unwrap().unwrap();
        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(updated.status.as_deref(), Some("em rota"));
    }

    #[tokio::test]
    async fn update_of_missing_id_returns_none() {
        let service = service();
        let result = service
            .update_by_id("missing", named("Ana"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_by_id_reports_removal() {
        let service = service();
        let stored = service.create(named("Ana")).await.unwrap();
        let id = stored.id.unwrap();

        assert!(service.delete_by_id(&id).await.unwrap());
        assert!(!service.delete_by_id(&id).await.unwrap());
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_time_marker_is_rejected_by_the_store() {
        let service = service();
        let mut record = named("Ana");
        record.time_of_day = Some(vec![9]);
        let result = service.create(record).await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }
}
