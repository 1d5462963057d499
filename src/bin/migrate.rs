//! Database maintenance tool: `migrate`, `check` and `reset` against the
//! database named by `DATABASE_URL`.

use anyhow::{anyhow, Result};
use salon_booking_bot::config::database_url_from_env;
use salon_booking_bot::database::connection::DatabaseManager;
use std::env;
use std::io;
use std::path::Path;

const EXPECTED_TABLES: [&str; 5] = ["services", "masters", "clients", "orders", "settings"];

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

fn sqlite_path(database_url: &str) -> Option<&str> {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
}

async fn run_migrations() -> Result<()> {
    println!("💅 Salon Booking Bot - Database Migration Tool");
    println!("==============================================");

    dotenvy::dotenv().ok();
    let database_url = database_url_from_env();

    println!("📊 Database URL: {}", mask_url(&database_url));

    // Ensure data directory exists for SQLite
    if let Some(db_path) = sqlite_path(&database_url) {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                println!("📁 Creating directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    println!("🚀 Running database migrations...");

    let db_manager = DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match db_manager.run_migrations().await {
        Ok(_) => println!("✅ Migrations completed successfully!"),
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    db_manager.seed_defaults().await?;
    println!("🌱 Default catalogue is in place");
    println!("\n🎯 Your salon database is ready!");

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    dotenvy::dotenv().ok();
    let database_url = database_url_from_env();

    println!("📊 Database URL: {}", mask_url(&database_url));

    let db_manager = DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in &tables {
                println!("  • {table}");
            }
            let missing: Vec<&str> = EXPECTED_TABLES
                .into_iter()
                .filter(|expected| !tables.iter().any(|table| table == expected))
                .collect();
            if !missing.is_empty() {
                println!("⚠️  Missing tables: {}", missing.join(", "));
                println!("💡 Try running 'migrate up' to create the schema");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let database_url = database_url_from_env();

    // For SQLite, we can just delete the file
    match sqlite_path(&database_url) {
        Some(db_path) => {
            if Path::new(db_path).exists() {
                std::fs::remove_file(db_path)?;
                println!("🗑️  Deleted database file: {db_path}");
            }
        }
        None => return Err(anyhow!("Reset is only supported for SQLite databases")),
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn mask_url(url: &str) -> String {
    match sqlite_path(url) {
        Some(path) => match Path::new(path).file_name() {
            Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}

fn print_help() {
    println!("💅 Salon Booking Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run database migrations and seed defaults (default)");
    println!("    check          Check database connection and schema");
    println!("    reset          Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/salon.db)");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                    # Run migrations");
    println!("    migrate check              # Check database status");
    println!("    migrate reset              # Reset database (careful!)");
    println!();
}
