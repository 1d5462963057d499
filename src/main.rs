//! # Salon Booking Bot Main Entry Point
//!
//! Initializes logging, loads configuration, prepares the database and runs
//! the Telegram bot next to the health check server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon_booking_bot::bot::context::AppContext;
use salon_booking_bot::bot::dialogue::State;
use salon_booking_bot::bot::handlers::BotHandler;
use salon_booking_bot::config::Config;
use salon_booking_bot::database::connection::DatabaseManager;
use salon_booking_bot::services::health::HealthService;
use salon_booking_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salon_booking_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Salon Booking Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Admins: {}",
        config.database_url,
        config.http_port,
        config.admin_ids.len()
    );
    if config.admin_ids.is_empty() {
        tracing::warn!("ADMIN_IDS is empty: orders will not be forwarded to anyone");
    }

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    db_manager.seed_defaults().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let ctx = AppContext::new(db_arc.as_ref().clone(), config.clone(), Arc::new(bot.clone()));
    let handler = BotHandler::new(ctx);
    info!("Telegram bot initialized successfully");

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);
    log_system_event("startup", Some("bot and health server running"));

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![InMemStorage::<State>::new()])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    log_system_event("shutdown", None);
    info!("Application stopped");
    Ok(())
}
