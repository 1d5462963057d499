use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A Telegram user who has talked to the bot.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Client {
    /// Row id
    pub id: i64,
    /// Telegram user id
    pub telegram_id: i64,
    /// First name at last contact
    pub first_name: Option<String>,
    /// Username at last contact
    pub username: Option<String>,
    /// Normalized phone, once the client booked
    pub phone: Option<String>,
    /// RFC 3339 timestamp of the first contact
    pub created_at: String,
}

/// A client row joined with the number of orders it placed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClientSummary {
    /// Row id
    pub id: i64,
    /// Telegram user id
    pub telegram_id: i64,
    /// First name at last contact
    pub first_name: Option<String>,
    /// Normalized phone, if known
    pub phone: Option<String>,
    /// RFC 3339 timestamp of the first contact
    pub created_at: String,
    /// Orders placed, including cancelled ones
    pub order_count: i64,
}

const CLIENT_COLUMNS: &str = "id, telegram_id, first_name, username, phone, created_at";

impl Client {
    /// Upserts a chat identity without touching a previously recorded phone.
    pub async fn register(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        first_name: Option<&str>,
        username: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO clients (telegram_id, first_name, username, phone, created_at)
            VALUES (?, ?, ?, NULL, ?)
            ON CONFLICT(telegram_id) DO UPDATE SET
                first_name = excluded.first_name,
                username = excluded.username
            "#,
        )
        .bind(telegram_id)
        .bind(first_name)
        .bind(username)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_telegram_id(pool, telegram_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Upserts the client at booking completion, storing the submitted phone.
    pub async fn record_phone(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        first_name: Option<&str>,
        username: Option<&str>,
        phone: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO clients (telegram_id, first_name, username, phone, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(telegram_id) DO UPDATE SET
                first_name = excluded.first_name,
                username = excluded.username,
                phone = excluded.phone
            "#,
        )
        .bind(telegram_id)
        .bind(first_name)
        .bind(username)
        .bind(phone)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_telegram_id(pool, telegram_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Looks a client up by Telegram id.
    pub async fn find_by_telegram_id(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE telegram_id = ?"
        ))
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
    }

    /// Chat ids of every known client, used as broadcast recipients.
    pub async fn recipient_ids(pool: &sqlx::SqlitePool) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT telegram_id FROM clients ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Clients with order counts, optionally restricted to those created since `since`.
    pub async fn list_summaries(
        pool: &sqlx::SqlitePool,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClientSummary>, sqlx::Error> {
        let since = since.map(|dt| dt.to_rfc3339());

        sqlx::query_as::<_, ClientSummary>(
            r#"
            SELECT c.id, c.telegram_id, c.first_name, c.phone, c.created_at,
                   COUNT(o.id) AS order_count
            FROM clients c
            LEFT JOIN orders o ON o.client_id = c.id
            WHERE (? IS NULL OR c.created_at >= ?)
            GROUP BY c.id
            ORDER BY c.id
            "#,
        )
        .bind(since.clone())
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
