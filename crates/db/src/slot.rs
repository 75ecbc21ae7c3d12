use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use trolley_core::errors::SlotError;
use trolley_core::ports::CartSlot;

use crate::DbPool;

/// Durable [`CartSlot`] backed by one row of the `cart_slot` table.
pub struct SqlCartSlot {
    pool: DbPool,
    slot_key: String,
}

impl SqlCartSlot {
    pub fn new(pool: DbPool, slot_key: impl Into<String>) -> Self {
        Self { pool, slot_key: slot_key.into() }
    }
}

#[async_trait]
impl CartSlot for SqlCartSlot {
    async fn read(&self) -> Result<Option<String>, SlotError> {
        let row = sqlx::query("SELECT payload FROM cart_slot WHERE slot_key = ?1")
            .bind(&self.slot_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| SlotError::Backend(error.to_string()))?;

        Ok(row.map(|row| row.get::<String, _>("payload")))
    }

    async fn write(&self, payload: &str) -> Result<(), SlotError> {
        sqlx::query(
            "INSERT INTO cart_slot (slot_key, payload, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(slot_key) DO UPDATE SET payload = excluded.payload, \
             updated_at = excluded.updated_at",
        )
        .bind(&self.slot_key)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|error| SlotError::Backend(error.to_string()))?;

        Ok(())
    }
}
