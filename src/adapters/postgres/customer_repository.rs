//! PostgreSQL implementation of CustomerRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{Customer, StoreError};
use crate::ports::CustomerRepository;

use super::{parse_record_id, read_coordinates};

/// Customer collection backed by the `customers` table.
#[derive(Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &PgRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        id: Some(row.try_get::<uuid::Uuid, _>("id")?.to_string()),
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        city: row.try_get("city")?,
        district: row.try_get("district")?,
        street: row.try_get("street")?,
        number: row.try_get("number")?,
        coordinates: read_coordinates(row)?,
    })
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query("SELECT * FROM customers")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::database)?;
        rows.iter()
            .map(|row| row_to_customer(row).map_err(StoreError::database))
            .collect()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query("SELECT * FROM customers WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::database)?;
        row.map(|row| row_to_customer(&row).map_err(StoreError::database))
            .transpose()
    }

    async fn insert(&self, record: &Customer) -> Result<Customer, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO customers (
                name, phone, city, district, street, number, latitude, longitude
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&record.name)
        .bind(&record.phone)
        .bind(&record.city)
        .bind(&record.district)
        .bind(&record.street)
        .bind(&record.number)
        .bind(record.coordinates.map(|c| c.latitude))
        .bind(record.coordinates.map(|c| c.longitude))
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row_to_customer(&row).map_err(StoreError::database)
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &Customer,
    ) -> Result<Option<Customer>, StoreError> {
        let id = parse_record_id(id)?;
        let row = sqlx::query(
            r#"
            UPDATE customers SET
                name = $2,
                phone = $3,
                city = $4,
                district = $5,
                street = $6,
                number = $7,
                latitude = $8,
                longitude = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.name)
        .bind(&record.phone)
        .bind(&record.city)
        .bind(&record.district)
        .bind(&record.street)
        .bind(&record.number)
        .bind(record.coordinates.map(|c| c.latitude))
        .bind(record.coordinates.map(|c| c.longitude))
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(|row| row_to_customer(&row).map_err(StoreError::database))
            .transpose()
    }
}
