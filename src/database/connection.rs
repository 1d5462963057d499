use anyhow::Result;
use sqlx::{SqlitePool, migrate::MigrateDatabase, Sqlite};
use tracing::info;

use crate::database::models::{setting, Category, Master, NewService, Service, Setting};

/// Default catalogue: (category, name, price, duration in minutes).
const DEFAULT_SERVICES: [(Category, &str, i64, i64); 5] = [
    (Category::Manicure, "Классический маникюр", 1500, 60),
    (Category::Manicure, "Гель-лак", 2000, 90),
    (Category::Extensions, "Наращивание ногтей", 2500, 120),
    (Category::Pedicure, "Классический педикюр", 1800, 75),
    (Category::Pedicure, "Мужской педикюр", 2000, 90),
];

/// Default masters: (name, phone, name of the service they perform).
const DEFAULT_MASTERS: [(&str, &str, &str); 5] = [
    ("Анна", "+79991234561", "Классический маникюр"),
    ("Мария", "+79991234562", "Гель-лак"),
    ("Елена", "+79991234563", "Наращивание ногтей"),
    ("Ольга", "+79991234564", "Классический педикюр"),
    ("Иван", "+79991234565", "Мужской педикюр"),
];

/// Owns the SQLite pool.
#[derive(Clone)]
pub struct DatabaseManager {
    /// Shared connection pool
    pub pool: SqlitePool,
}

impl DatabaseManager {
    /// Connects, creating the database file when missing.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating database {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        Ok(Self { pool })
    }

    /// Applies the embedded migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Seeds the default catalogue into empty tables. Safe to call on every start.
    pub async fn seed_defaults(&self) -> Result<()> {
        if Service::count(&self.pool).await? == 0 {
            info!("Seeding default services");
            for (category, name, price, duration) in DEFAULT_SERVICES {
                Service::create(
                    &self.pool,
                    NewService {
                        category,
                        name: name.to_string(),
                        price,
                        duration,
                        master_id: None,
                    },
                )
                .await?;
            }
        }

        if Master::count(&self.pool).await? == 0 {
            info!("Seeding default masters");
            let services = Service::list_all(&self.pool).await?;
            for (name, phone, service_name) in DEFAULT_MASTERS {
                let service_ids: Vec<i64> = services
                    .iter()
                    .filter(|service| service.name == service_name)
                    .map(|service| service.id)
                    .collect();
                Master::create(&self.pool, name, Some(phone), &service_ids).await?;
            }
        }

        Setting::insert_default(
            &self.pool,
            setting::WELCOME_MESSAGE,
            setting::DEFAULT_WELCOME_MESSAGE,
        )
        .await?;

        Ok(())
    }
}
