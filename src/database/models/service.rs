use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Service categories offered by the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Маникюр
    Manicure,
    /// Педикюр
    Pedicure,
    /// Наращивание
    Extensions,
}

impl Category {
    /// Every category in menu order.
    pub const ALL: [Category; 3] = [Category::Manicure, Category::Pedicure, Category::Extensions];

    /// Label shown on menu buttons and stored in the `category` column.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Manicure => "Маникюр",
            Category::Pedicure => "Педикюр",
            Category::Extensions => "Наращивание",
        }
    }

    /// Exact match against a button label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

/// A catalogue entry.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Service {
    /// Row id
    pub id: i64,
    /// Category label, see [`Category::label`]
    pub category: String,
    /// Service name shown on buttons
    pub name: String,
    /// Price in roubles
    pub price: i64,
    /// Duration in minutes
    pub duration: i64,
    /// Master assigned to the service directly
    pub master_id: Option<i64>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    /// RFC 3339 timestamp of the last edit
    pub updated_at: String,
}

/// Fields of a service to insert.
#[derive(Debug, Clone)]
pub struct NewService {
    /// Category
    pub category: Category,
    /// Validated name
    pub name: String,
    /// Price in roubles
    pub price: i64,
    /// Duration in minutes
    pub duration: i64,
    /// Directly assigned master
    pub master_id: Option<i64>,
}

const SERVICE_COLUMNS: &str =
    "id, category, name, price, duration, master_id, created_at, updated_at";

impl Service {
    /// Button label used by the booking menu, matched verbatim on selection.
    pub fn menu_label(&self) -> String {
        format!("{} - {} руб.", self.name, self.price)
    }

    /// One-line description used in admin listings.
    pub fn admin_line(&self) -> String {
        format!("{}. {} - {} руб. ({})", self.id, self.name, self.price, self.category)
    }

    /// Inserts a service and returns the stored row.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        new: NewService,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO services (category, name, price, duration, master_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.category.label())
        .bind(&new.name)
        .bind(new.price)
        .bind(new.duration)
        .bind(new.master_id)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Fetches a service by id.
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        service_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?"
        ))
        .bind(service_id)
        .fetch_optional(pool)
        .await
    }

    /// Services of one category ordered by id.
    pub async fn find_by_category(
        pool: &sqlx::SqlitePool,
        category: Category,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE category = ? ORDER BY id"
        ))
        .bind(category.label())
        .fetch_all(pool)
        .await
    }

    /// All services ordered by category, then insertion order.
    pub async fn list_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services ORDER BY category, id"
        ))
        .fetch_all(pool)
        .await
    }

    /// Returns `false` when no service has the given id.
    pub async fn update(
        pool: &sqlx::SqlitePool,
        service_id: i64,
        category: Category,
        name: &str,
        price: i64,
        duration: i64,
        master_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            UPDATE services
            SET category = ?, name = ?, price = ?, duration = ?, master_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(category.label())
        .bind(name)
        .bind(price)
        .bind(duration)
        .bind(master_id)
        .bind(now)
        .bind(service_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Existing orders keep pointing at the id.
    pub async fn delete(pool: &sqlx::SqlitePool, service_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(service_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of services.
    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("маникюр"), None);
        assert_eq!(Category::from_label(" Маникюр"), None);
    }

    #[test]
    fn test_menu_label() {
        let service = Service {
            id: 1,
            category: "Маникюр".to_string(),
            name: "Гель-лак".to_string(),
            price: 2000,
            duration: 90,
            master_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(service.menu_label(), "Гель-лак - 2000 руб.");
        assert_eq!(service.admin_line(), "1. Гель-лак - 2000 руб. (Маникюр)");
    }
}
