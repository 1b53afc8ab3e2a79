//! PostgreSQL implementation of DeliveryRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{Delivery, StoreError};
use crate::ports::DeliveryRepository;

use super::{parse_record_id, read_coordinates};

/// Delivery collection backed by the `deliveries` table.
#[derive(Clone)]
pub struct PostgresDeliveryRepository {
    pool: PgPool,
}

impl PostgresDeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_delivery(row: &PgRow) -> Result<Delivery, sqlx::Error> {
    Ok(Delivery {
        id: Some(row.try_get::<uuid::Uuid, _>("id")?.to_string()),
        day: row.try_get("day")?,
        name: row.try_get("name")?,
        status: row.try_get("status")?,
        phone: row.try_get("phone")?,
        city: row.try_get("city")?,
        district: row.try_get("district")?,
        street: row.try_get("street")?,
        number: row.try_get("number")?,
        coordinates: read_coordinates(row)?,
        value: row.try_get("value")?,
        payment: row.try_get("payment")?,
        payment_status: row.try_get("payment_status")?,
        courier: row.try_get("courier")?,
        volume: row.try_get("volume")?,
        notes: row.try_get("notes")?,
        time_of_day: row.try_get("time_of_day")?,
        message_status: row.try_get("message_status")?,
    })
}

#[async_trait]
impl DeliveryRepository for PostgresDeliveryRepository {
    async fn find_by_day(&self, day: &[i32]) -> Result<Vec<Delivery>, StoreError> {
        let rows = sqlx::query("SELECT * FROM deliveries WHERE day = $1")
            .bind(day.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::database)?;
        rows.iter()
            .map(|row| row_to_delivery(row).map_err(StoreError::database))
            .collect()
    }

    async fn find_all(&self) -> Result<Vec<Delivery>, StoreError> {
        let rows = sqlx::query("SELECT * FROM deliveries")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::database)?;
        rows.iter()
            .map(|row| row_to_delivery(row).map_err(StoreError::database))
            .collect()
    }

    async fn insert(&self, record: &Delivery) -> Result<Delivery, StoreError> {
        record.validate_for_store()?;
        let row = sqlx::query(
            r#"
            INSERT INTO deliveries (
                day, name, status, phone, city, district, street, number,
                latitude, longitude, value, payment, payment_status, courier,
                volume, notes, time_of_day, message_status
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8,
                $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18
            )
            RETURNING *
            "#,
        )
        .bind(&record.day)
        .bind(&record.name)
        .bind(&record.status)
        .bind(&record.phone)
        .bind(&record.city)
        .bind(&record.district)
        .bind(&record.street)
        .bind(&record.number)
        .bind(record.coordinates.map(|c| c.latitude))
        .bind(record.coordinates.map(|c| c.longitude))
        .bind(&record.value)
        .bind(&record.payment)
        .bind(&record.payment_status)
        .bind(&record.courier)
        .bind(&record.volume)
        .bind(&record.notes)
        .bind(&record.time_of_day)
        .bind(&record.message_status)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row_to_delivery(&row).map_err(StoreError::database)
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &Delivery,
    ) -> Result<Option<Delivery>, StoreError> {
        record.validate_for_store()?;
        let id = parse_record_id(id)?;
        let row = sqlx::query(
            r#"
            UPDATE deliveries SET
                day = $2,
                name = $3,
                status = $4,
                phone = $5,
                city = $6,
                district = $7,
                street = $8,
                number = $9,
                latitude = $10,
                longitude = $11,
                value = $12,
                payment = $13,
                payment_status = $14,
                courier = $15,
                volume = $16,
                notes = $17,
                time_of_day = $18,
                message_status = $19
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.day)
        .bind(&record.name)
        .bind(&record.status)
        .bind(&record.phone)
        .bind(&record.city)
        .bind(&record.district)
        .bind(&record.street)
        .bind(&record.number)
        .bind(record.coordinates.map(|c| c.latitude))
        .bind(record.coordinates.map(|c| c.longitude))
        .bind(&record.value)
        .bind(&record.payment)
        .bind(&record.payment_status)
        .bind(&record.courier)
        .bind(&record.volume)
        .bind(&record.notes)
        .bind(&record.time_of_day)
        .bind(&record.message_status)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(|row| row_to_delivery(&row).map_err(StoreError::database))
            .transpose()
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let id = parse_record_id(id)?;
        let result = sqlx::query("DELETE FROM deliveries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::database)?;
        Ok(result.rows_affected() > 0)
    }
}
