use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{parse_day, SpecialDay, SpecialDayInput, Union, UnionInput};

/// Read access the reminder job needs. Writes belong to the admin API only.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn list_unions(&self) -> AppResult<Vec<Union>>;

    async fn get_union(&self, id: &str) -> AppResult<Option<Union>>;

    /// When `with_union` is set, scoped days carry their union in `SpecialDay::union`.
    async fn list_special_days(&self, with_union: bool) -> AppResult<Vec<SpecialDay>>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

const SPECIAL_DAY_SELECT: &str = r#"
    SELECT s.id, s.title, s.description, s.date, s.is_recurring, s.reminder_days_before,
           s.union_id, s.created_at,
           u.id AS u_id, u.name AS u_name, u.telegram_chat_id AS u_telegram_chat_id,
           u.internal_chat_id AS u_internal_chat_id, u.created_at AS u_created_at
    FROM special_days s
    LEFT JOIN unions u ON u.id = s.union_id
"#;

fn union_from_row(row: &SqliteRow) -> Union {
    Union {
        id: row.get::<String, _>("id"),
        name: row.get::<String, _>("name"),
        telegram_chat_id: row.try_get::<Option<String>, _>("telegram_chat_id").unwrap_or(None),
        internal_chat_id: row.try_get::<Option<String>, _>("internal_chat_id").unwrap_or(None),
        created_at: row.get::<String, _>("created_at"),
    }
}

fn special_day_from_row(row: &SqliteRow, with_union: bool) -> SpecialDay {
    let raw_date = row.get::<String, _>("date");
    let union = if with_union {
        row.try_get::<Option<String>, _>("u_id")
            .unwrap_or(None)
            .map(|id| Union {
                id,
                name: row.get::<String, _>("u_name"),
                telegram_chat_id: row.try_get::<Option<String>, _>("u_telegram_chat_id").unwrap_or(None),
                internal_chat_id: row.try_get::<Option<String>, _>("u_internal_chat_id").unwrap_or(None),
                created_at: row.get::<String, _>("u_created_at"),
            })
    } else {
        None
    };

    SpecialDay {
        id: row.get::<String, _>("id"),
        title: row.get::<String, _>("title"),
        description: row.try_get::<Option<String>, _>("description").unwrap_or(None),
        date: parse_day(&raw_date),
        is_recurring: row.get::<bool, _>("is_recurring"),
        reminder_days_before: u32::try_from(row.get::<i64, _>("reminder_days_before")).unwrap_or(0),
        union_id: row.try_get::<Option<String>, _>("union_id").unwrap_or(None),
        created_at: row.get::<String, _>("created_at"),
        union,
    }
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_union(&self, input: &UnionInput) -> AppResult<Union> {
        let union = Union {
            id: Uuid::new_v4().to_string(),
            name: input.name.clone(),
            telegram_chat_id: input.telegram_chat_id.clone(),
            internal_chat_id: input.internal_chat_id.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO unions (id, name, telegram_chat_id, internal_chat_id, created_at)
             VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&union.id)
        .bind(&union.name)
        .bind(&union.telegram_chat_id)
        .bind(&union.internal_chat_id)
        .bind(&union.created_at)
        .execute(&self.pool)
        .await?;

        Ok(union)
    }

    pub async fn update_union(&self, id: &str, input: &UnionInput) -> AppResult<Option<Union>> {
        let result = sqlx::query(
            "UPDATE unions SET name = ?, telegram_chat_id = ?, internal_chat_id = ? WHERE id = ?"
        )
        .bind(&input.name)
        .bind(&input.telegram_chat_id)
        .bind(&input.internal_chat_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_union(id).await
    }

    pub async fn delete_union(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM unions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_special_day(&self, id: &str) -> AppResult<Option<SpecialDay>> {
        let row = sqlx::query(&format!("{} WHERE s.id = ? LIMIT 1", SPECIAL_DAY_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| special_day_from_row(&r, true)))
    }

    pub async fn create_special_day(&self, input: &SpecialDayInput) -> AppResult<SpecialDay> {
        self.ensure_union_exists(input.union_id.as_deref()).await?;

        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        insert_special_day(&self.pool, &id, input, &created_at).await?;

        self.get_special_day(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Special day vanished after insert".to_string()))
    }

    pub async fn update_special_day(&self, id: &str, input: &SpecialDayInput) -> AppResult<Option<SpecialDay>> {
        self.ensure_union_exists(input.union_id.as_deref()).await?;

        let result = sqlx::query(
            "UPDATE special_days
             SET title = ?, description = ?, date = ?, is_recurring = ?, reminder_days_before = ?, union_id = ?
             WHERE id = ?"
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.date.format("%Y-%m-%d").to_string())
        .bind(input.is_recurring)
        .bind(i64::from(input.reminder_days_before))
        .bind(&input.union_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_special_day(id).await
    }

    pub async fn delete_special_day(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM special_days WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Inserts all days in one transaction; nothing is written if any insert fails.
    pub async fn bulk_create_special_days(&self, inputs: &[SpecialDayInput]) -> AppResult<usize> {
        let mut union_ids: Vec<&str> = inputs.iter().filter_map(|i| i.union_id.as_deref()).collect();
        union_ids.dedup();
        for union_id in union_ids {
            self.ensure_union_exists(Some(union_id)).await?;
        }

        let created_at = chrono::Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        for input in inputs {
            insert_special_day(&mut tx, &Uuid::new_v4().to_string(), input, &created_at).await?;
        }
        tx.commit().await?;

        Ok(inputs.len())
    }

    async fn ensure_union_exists(&self, union_id: Option<&str>) -> AppResult<()> {
        match union_id {
            Some(id) if self.get_union(id).await?.is_none() => {
                Err(AppError::BadRequest(format!("Union {} does not exist", id)))
            }
            _ => Ok(()),
        }
    }
}

async fn insert_special_day<'e, E>(
    executor: E,
    id: &str,
    input: &SpecialDayInput,
    created_at: &str,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO special_days (id, title, description, date, is_recurring, reminder_days_before, union_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.date.format("%Y-%m-%d").to_string())
    .bind(input.is_recurring)
    .bind(i64::from(input.reminder_days_before))
    .bind(&input.union_id)
    .bind(created_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl ReminderStore for SqliteStore {
    async fn list_unions(&self) -> AppResult<Vec<Union>> {
        let rows = sqlx::query(
            "SELECT id, name, telegram_chat_id, internal_chat_id, created_at
             FROM unions
             ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(union_from_row).collect())
    }

    async fn get_union(&self, id: &str) -> AppResult<Option<Union>> {
        let row = sqlx::query(
            "SELECT id, name, telegram_chat_id, internal_chat_id, created_at
             FROM unions
             WHERE id = ?
             LIMIT 1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(union_from_row))
    }

    async fn list_special_days(&self, with_union: bool) -> AppResult<Vec<SpecialDay>> {
        let rows = sqlx::query(&format!("{} ORDER BY s.date ASC, s.created_at ASC", SPECIAL_DAY_SELECT))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| special_day_from_row(r, with_union)).collect())
    }
}
