//! Courier service.

use std::sync::Arc;

use crate::domain::{Courier, StoreError};
use crate::ports::{CourierRepository, CredentialVerifier};

/// Courier operations over the record store.
#[derive(Clone)]
pub struct CourierService {
    repository: Arc<dyn CourierRepository>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl CourierService {
    pub fn new(
        repository: Arc<dyn CourierRepository>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            repository,
            verifier,
        }
    }

    /// All couriers in the collection.
    pub async fn find_all(&self) -> Result<Vec<Courier>, StoreError> {
        self.repository.find_all().await
    }

    /// Look up a courier by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Courier>, StoreError> {
        self.repository.find_by_username(username).await
    }

    /// Identify a courier by username alone.
    ///
    /// This is the variant the wire contract exercises: a lookup, not a
    /// credential check. `None` means "could not identify", which the hub
    /// reports as a normal response rather than an error.
    pub async fn authenticate_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Courier>, StoreError> {
        self.repository.find_by_username(username).await
    }

    /// Credential-checking variant. Present on the service surface but not
    /// wired to any command; the comparison goes through the pluggable
    /// verifier rather than touching the stored secret directly.
    pub async fn authenticate_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Courier>, StoreError> {
        let found = self.repository.find_by_username(username).await?;
        Ok(found.filter(|courier| {
            courier
                .password
                .as_deref()
                .is_some_and(|stored| self.verifier.verify(password, stored))
        }))
    }

    /// Update the courier with this record's username, never persisting a
    /// payload `id` field. Returns `None` when no such courier exists.
    pub async fn update_by_username(
        &self,
        mut record: Courier,
    ) -> Result<Option<Courier>, StoreError> {
        let Some(existing) = self.repository.find_by_username(&record.username).await? else {
            return Ok(None);
        };
        let Some(id) = existing.id else {
            return Ok(None);
        };
        record.id = None;
        self.repository.update_by_id(&id, &record).await
    }
}
