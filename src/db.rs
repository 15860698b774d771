use sqlx::{sqlite::{SqlitePoolOptions, SqliteConnectOptions}, SqlitePool};
use std::str::FromStr;

pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    // every connection to `sqlite::memory:` opens its own database
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_opts)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS unions (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            telegram_chat_id TEXT,
            internal_chat_id TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS special_days (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            date TEXT NOT NULL,
            is_recurring INTEGER NOT NULL DEFAULT 0,
            reminder_days_before INTEGER NOT NULL DEFAULT 0,
            union_id TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(union_id) REFERENCES unions(id) ON DELETE CASCADE
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_special_days_union ON special_days(union_id);")
        .execute(&pool)
        .await?;

    Ok(pool)
}

#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    init_pool("sqlite::memory:")
        .await
        .expect("in-memory pool")
}
