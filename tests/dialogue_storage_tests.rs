use salon_booking_bot::bot::context::AppContext;
use salon_booking_bot::bot::dialogue::{AdminState, State};
use salon_booking_bot::bot::handlers::BotHandler;
use salon_booking_bot::config::Config;
use salon_booking_bot::database::connection::DatabaseManager;
use salon_booking_bot::database::models::Category;
use std::sync::Arc;
use teloxide::dispatching::dialogue::{InMemStorage, Storage};
use teloxide::types::ChatId;
use teloxide::Bot;
use tempfile::TempDir;

async fn create_test_db() -> (DatabaseManager, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let db = DatabaseManager::new(&db_url)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");

    (db, temp_dir)
}

#[tokio::test]
async fn test_dialogue_storage_setup() {
    let (db, _temp_dir) = create_test_db().await;

    let config = Config {
        telegram_bot_token: "123456:TEST".to_string(),
        database_url: String::new(),
        http_port: 0,
        admin_ids: vec![],
        studio_phone: String::new(),
        website_url: String::new(),
        telegram_channel: String::new(),
        location_lat: 0.0,
        location_lon: 0.0,
        price_list_font: None,
    };
    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(AppContext::new(db, config, Arc::new(bot)));

    // Building the schema must not panic
    let _schema = handler.schema();
}

#[tokio::test]
async fn test_dialogue_state_is_kept_per_chat() {
    let storage = InMemStorage::<State>::new();

    let booking = State::ChoosingMaster { category: Category::Manicure, service_id: 2 };
    let admin = State::Admin(AdminState::Broadcast);

    storage.clone().update_dialogue(ChatId(1), booking.clone()).await.unwrap();
    storage.clone().update_dialogue(ChatId(2), admin.clone()).await.unwrap();

    assert_eq!(storage.clone().get_dialogue(ChatId(1)).await.unwrap(), Some(booking));
    assert_eq!(storage.clone().get_dialogue(ChatId(2)).await.unwrap(), Some(admin));
    assert_eq!(storage.clone().get_dialogue(ChatId(3)).await.unwrap(), None);

    storage.clone().remove_dialogue(ChatId(1)).await.unwrap();
    assert_eq!(storage.get_dialogue(ChatId(1)).await.unwrap(), None);
}
