use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::database::connection::DatabaseManager;
use crate::database::models::{Master, Order, OrderStatus, Service};
use chrono::{DateTime, Utc};

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// Time of the check
    pub timestamp: DateTime<Utc>,
    /// Crate version
    pub version: String,
    /// Database check result
    pub database: DatabaseHealth,
    /// Catalogue counters, absent when the database is down
    pub catalog: Option<CatalogHealth>,
    /// Seconds since the health service started
    pub uptime_seconds: u64,
}

/// Result of a `SELECT 1` round trip.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// `healthy` or `unhealthy`
    pub status: String,
    /// Open pool connections
    pub connection_pool_size: u32,
    /// Round trip time
    pub response_time_ms: u64,
}

/// Row counts that show the bot has data to offer.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogHealth {
    /// Number of services
    pub services: i64,
    /// Number of masters
    pub masters: i64,
    /// Orders still waiting for confirmation
    pub pending_orders: i64,
}

/// Axum state shared by the health handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle
    pub db: Arc<DatabaseManager>,
    /// Used for the uptime counter
    pub start_time: DateTime<Utc>,
}

/// Health check router.
pub struct HealthService {
    /// Routes under `/health`
    pub router: Router,
}

impl HealthService {
    /// Builds the router with request tracing.
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        let state = AppState {
            db,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let db_healthy = test_database_connection(&state.db).await.is_ok();
    let response_time_ms = start.elapsed().as_millis() as u64;

    let catalog = if db_healthy {
        match catalog_counts(&state.db).await {
            Ok(counts) => Some(counts),
            Err(e) => {
                tracing::warn!("Failed to read catalog counts: {}", e);
                None
            }
        }
    } else {
        None
    };

    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    let db_status = if db_healthy { "healthy" } else { "unhealthy" };

    let health_response = HealthResponse {
        status: db_status.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: db_status.to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        catalog,
        uptime_seconds: uptime,
    };

    if db_healthy {
        Ok(Json(health_response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(db: &DatabaseManager) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1")
        .fetch_one(&db.pool)
        .await?;

    Ok(())
}

async fn catalog_counts(db: &DatabaseManager) -> Result<CatalogHealth, sqlx::Error> {
    Ok(CatalogHealth {
        services: Service::count(&db.pool).await?,
        masters: Master::count(&db.pool).await?,
        pending_orders: Order::count_by_status(&db.pool, OrderStatus::Pending).await?,
    })
}
