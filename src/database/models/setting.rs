use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Greeting shown on /start
pub const WELCOME_MESSAGE: &str = "welcome_message";
/// Channel link
pub const TELEGRAM_CHANNEL: &str = "telegram_channel";
/// Website link
pub const WEBSITE_URL: &str = "website_url";
/// Studio latitude as text
pub const LOCATION_LAT: &str = "location_lat";
/// Studio longitude as text
pub const LOCATION_LON: &str = "location_lon";

/// Seeded greeting
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Рады Вас видеть в нашей студии маникюра \"Ноготочки-Точка\"!";

/// A key-value row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Setting {
    /// Setting key
    pub key: String,
    /// Raw value
    pub value: String,
    /// RFC 3339 timestamp of the last change
    pub updated_at: String,
}

impl Setting {
    /// Value for the key, if set.
    pub async fn get(pool: &sqlx::SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Value for the key or the given default.
    pub async fn get_or(
        pool: &sqlx::SqlitePool,
        key: &str,
        default: &str,
    ) -> Result<String, sqlx::Error> {
        Ok(Self::get(pool, key)
            .await?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Upserts the value.
    pub async fn update(pool: &sqlx::SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts the value only when the key is absent.
    pub async fn insert_default(
        pool: &sqlx::SqlitePool,
        key: &str,
        value: &str,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT OR IGNORE INTO settings (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(pool)
            .await?;

        Ok(())
    }
}
