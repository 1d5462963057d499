use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A salon master.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Master {
    /// Row id
    pub id: i64,
    /// Display name, also stored on orders
    pub name: String,
    /// Comma separated ids of the services performed
    pub specialization: String,
    /// Normalized phone
    pub phone: Option<String>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

const MASTER_COLUMNS: &str = "id, name, specialization, phone, created_at";

/// Serialises service ids into the delimited `specialization` column.
pub fn join_service_ids(service_ids: &[i64]) -> String {
    service_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl Master {
    /// Service ids this master performs. Malformed entries are ignored.
    pub fn service_ids(&self) -> Vec<i64> {
        self.specialization
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    }

    /// `id. name (услуги: ids)` line for admin lists.
    pub fn admin_line(&self) -> String {
        let services = if self.specialization.is_empty() {
            "—"
        } else {
            self.specialization.as_str()
        };
        format!("{}. {} (услуги: {})", self.id, self.name, services)
    }

    /// Inserts a master linked to the given services.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        name: &str,
        phone: Option<&str>,
        service_ids: &[i64],
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO masters (name, specialization, phone, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(join_service_ids(service_ids))
        .bind(phone)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Fetches a master by id.
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        master_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Master>(&format!(
            "SELECT {MASTER_COLUMNS} FROM masters WHERE id = ?"
        ))
        .bind(master_id)
        .fetch_optional(pool)
        .await
    }

    /// All masters ordered by id.
    pub async fn list_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Master>(&format!("SELECT {MASTER_COLUMNS} FROM masters ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    /// Masters whose affinity list contains the service. The affinity column is
    /// a delimited string, so the filtering happens here rather than in SQL.
    pub async fn find_for_service(
        pool: &sqlx::SqlitePool,
        service_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let masters = Self::list_all(pool).await?;
        Ok(masters
            .into_iter()
            .filter(|master| master.service_ids().contains(&service_id))
            .collect())
    }

    /// Replaces name and services. Returns false when the master is gone.
    pub async fn update(
        pool: &sqlx::SqlitePool,
        master_id: i64,
        name: &str,
        service_ids: &[i64],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE masters SET name = ?, specialization = ? WHERE id = ?")
            .bind(name)
            .bind(join_service_ids(service_ids))
            .bind(master_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Orders keep the master name.
    pub async fn delete(pool: &sqlx::SqlitePool, master_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM masters WHERE id = ?")
            .bind(master_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of masters.
    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM masters")
            .fetch_one(pool)
            .await
    }
}
