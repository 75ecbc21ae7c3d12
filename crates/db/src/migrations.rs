use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::connect_with_settings;

    // Single-connection pools: `sqlite::memory:` databases are
    // per-connection.
    #[tokio::test]
    async fn migrations_create_the_cart_slot_table() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        run_pending(&pool).await.expect("migrate");

        let row = sqlx::query(
            "SELECT count(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'cart_slot'",
        )
        .fetch_one(&pool)
        .await
        .expect("schema query");

        assert_eq!(row.get::<i64, _>("n"), 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");
    }
}
