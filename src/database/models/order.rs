use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Just booked
    Pending,
    /// Confirmed by the salon
    Confirmed,
    /// Service done
    Completed,
    /// Cancelled by either side
    Cancelled,
}

impl OrderStatus {
    /// Every status in display order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Value stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Russian label used on buttons and in reports.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Ожидает",
            OrderStatus::Confirmed => "Подтверждена",
            OrderStatus::Completed => "Выполнена",
            OrderStatus::Cancelled => "Отменена",
        }
    }

    /// Inverse of `as_str`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Inverse of `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

/// A booking row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    /// Row id
    pub id: i64,
    /// Client row id
    pub client_id: i64,
    /// Service row id
    pub service_id: i64,
    /// Master name at booking time
    pub master_name: String,
    /// Stored status, see [`OrderStatus::as_str`]
    pub status: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    /// RFC 3339 timestamp of the last status change
    pub updated_at: String,
}

/// Order joined with its client and service. Service or client may have been
/// deleted since, hence the optional columns.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Order id
    pub id: i64,
    /// Client first name
    pub client_name: Option<String>,
    /// Client phone
    pub phone: Option<String>,
    /// Service category
    pub category: Option<String>,
    /// Service name
    pub service_name: Option<String>,
    /// Service price in roubles
    pub price: Option<i64>,
    /// Master name at booking time
    pub master_name: String,
    /// Stored status
    pub status: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl OrderDetails {
    /// Russian label, or the raw value when unknown.
    pub fn status_label(&self) -> &str {
        OrderStatus::parse(&self.status)
            .map(|status| status.label())
            .unwrap_or(self.status.as_str())
    }
}

const ORDER_COLUMNS: &str = "id, client_id, service_id, master_name, status, created_at, updated_at";

impl Order {
    /// Inserts a pending order.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        client_id: i64,
        service_id: i64,
        master_name: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO orders (client_id, service_id, master_name, status, created_at, updated_at)
            VALUES (?, ?, ?, 'pending', ?, ?)
            "#,
        )
        .bind(client_id)
        .bind(service_id)
        .bind(master_name)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Fetches an order by id.
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        order_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(order_id)
            .fetch_optional(pool)
            .await
    }

    /// Sets the status. Returns false when the order is gone.
    pub async fn update_status(
        pool: &sqlx::SqlitePool,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(now)
            .bind(order_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Newest orders first.
    pub async fn list_details(pool: &sqlx::SqlitePool) -> Result<Vec<OrderDetails>, sqlx::Error> {
        sqlx::query_as::<_, OrderDetails>(
            r#"
            SELECT o.id, c.first_name AS client_name, c.phone, s.category,
                   s.name AS service_name, s.price, o.master_name, o.status, o.created_at
            FROM orders o
            LEFT JOIN clients c ON c.id = o.client_id
            LEFT JOIN services s ON s.id = o.service_id
            ORDER BY o.id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Number of orders in the given status.
    pub async fn count_by_status(
        pool: &sqlx::SqlitePool,
        status: OrderStatus,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Number of orders.
    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
            assert_eq!(OrderStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(OrderStatus::parse("unknown"), None);
    }
}
