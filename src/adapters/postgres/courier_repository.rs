//! PostgreSQL implementation of CourierRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{Courier, CourierStatus, StoreError};
use crate::ports::CourierRepository;

use super::{parse_record_id, read_coordinates};

/// Courier collection backed by the `couriers` table.
#[derive(Clone)]
pub struct PostgresCourierRepository {
    pool: PgPool,
}

impl PostgresCourierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn status_to_column(status: Option<CourierStatus>) -> Option<&'static str> {
    status.map(|status| match status {
        CourierStatus::Available => "disponível",
        CourierStatus::Unavailable => "indisponível",
        CourierStatus::Busy => "ocupado",
        CourierStatus::Offline => "offline",
    })
}

fn status_from_column(value: Option<String>) -> Result<Option<CourierStatus>, sqlx::Error> {
    match value.as_deref() {
        None => Ok(None),
        Some("disponível") => Ok(Some(CourierStatus::Available)),
        Some("indisponível") => Ok(Some(CourierStatus::Unavailable)),
        Some("ocupado") => Ok(Some(CourierStatus::Busy)),
        Some("offline") => Ok(Some(CourierStatus::Offline)),
        Some(other) => Err(sqlx::Error::Decode(
            format!("unknown courier status {other:?}").into(),
        )),
    }
}

fn row_to_courier(row: &PgRow) -> Result<Courier, sqlx::Error> {
    Ok(Courier {
        id: Some(row.try_get::<uuid::Uuid, _>("id")?.to_string()),
        name: row.try_get("name")?,
        status: status_from_column(row.try_get("status")?)?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        location: read_coordinates(row)?,
    })
}

#[async_trait]
impl CourierRepository for PostgresCourierRepository {
    async fn find_all(&self) -> Result<Vec<Courier>, StoreError> {
        let rows = sqlx::query("SELECT * FROM couriers")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::database)?;
        rows.iter()
            .map(|row| row_to_courier(row).map_err(StoreError::database))
            .collect()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Courier>, StoreError> {
        let row = sqlx::query("SELECT * FROM couriers WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::database)?;
        row.map(|row| row_to_courier(&row).map_err(StoreError::database))
            .transpose()
    }

    async fn insert(&self, record: &Courier) -> Result<Courier, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO couriers (
                name, status, username, password, latitude, longitude
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&record.name)
        .bind(status_to_column(record.status))
        .bind(&record.username)
        .bind(&record.password)
        .bind(record.location.map(|c| c.latitude))
        .bind(record.location.map(|c| c.longitude))
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row_to_courier(&row).map_err(StoreError::database)
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &Courier,
    ) -> Result<Option<Courier>, StoreError> {
        let id = parse_record_id(id)?;
        let row = sqlx::query(
            r#"
            UPDATE couriers SET
                name = $2,
                status = $3,
                username = $4,
                password = $5,
                latitude = $6,
                longitude = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.name)
        .bind(status_to_column(record.status))
        .bind(&record.username)
        .bind(&record.password)
        .bind(record.location.map(|c| c.latitude))
        .bind(record.location.map(|c| c.longitude))
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(|row| row_to_courier(&row).map_err(StoreError::database))
            .transpose()
    }
}
