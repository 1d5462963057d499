use anyhow::Result;
use chrono::{Duration, Utc};
use salon_booking_bot::database::{connection::DatabaseManager, models::*};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn new_service(category: Category, name: &str, price: i64) -> NewService {
    NewService {
        category,
        name: name.to_string(),
        price,
        duration: 60,
        master_id: None,
    }
}

#[tokio::test]
async fn test_seed_defaults_is_idempotent() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    db.seed_defaults().await?;
    db.seed_defaults().await?;

    assert_eq!(Service::count(&db.pool).await?, 5);
    assert_eq!(Master::count(&db.pool).await?, 5);

    let manicure = Service::find_by_category(&db.pool, Category::Manicure).await?;
    let names: Vec<&str> = manicure.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Классический маникюр", "Гель-лак"]);

    let gel = &manicure[1];
    let masters = Master::find_for_service(&db.pool, gel.id).await?;
    assert_eq!(masters.len(), 1);
    assert_eq!(masters[0].name, "Мария");

    let welcome = Setting::get(&db.pool, setting::WELCOME_MESSAGE).await?;
    assert_eq!(welcome.as_deref(), Some(setting::DEFAULT_WELCOME_MESSAGE));

    Ok(())
}

#[tokio::test]
async fn test_seed_keeps_customised_welcome() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Setting::update(&db.pool, setting::WELCOME_MESSAGE, "Добро пожаловать!").await?;
    db.seed_defaults().await?;

    let welcome = Setting::get(&db.pool, setting::WELCOME_MESSAGE).await?;
    assert_eq!(welcome.as_deref(), Some("Добро пожаловать!"));

    Ok(())
}

#[tokio::test]
async fn test_service_crud() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let service = Service::create(&db.pool, new_service(Category::Pedicure, "SPA педикюр", 2500)).await?;
    assert_eq!(service.category, "Педикюр");
    assert_eq!(service.menu_label(), "SPA педикюр - 2500 руб.");

    let updated = Service::update(
        &db.pool,
        service.id,
        Category::Manicure,
        "SPA маникюр",
        2700,
        80,
        None,
    )
    .await?;
    assert!(updated);

    let found = Service::find_by_id(&db.pool, service.id).await?.unwrap();
    assert_eq!(found.category, "Маникюр");
    assert_eq!(found.name, "SPA маникюр");
    assert_eq!(found.price, 2700);
    assert_eq!(found.duration, 80);
    assert_eq!(found.master_id, None);

    assert!(Service::find_by_category(&db.pool, Category::Pedicure).await?.is_empty());

    assert!(Service::delete(&db.pool, service.id).await?);
    assert!(!Service::delete(&db.pool, service.id).await?);
    assert!(Service::find_by_id(&db.pool, service.id).await?.is_none());
    assert!(!Service::update(&db.pool, service.id, Category::Manicure, "x", 1, 1, None).await?);

    Ok(())
}

#[tokio::test]
async fn test_category_listing_is_restricted() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Service::create(&db.pool, new_service(Category::Manicure, "Маникюр А", 1000)).await?;
    Service::create(&db.pool, new_service(Category::Extensions, "Наращивание Б", 3000)).await?;
    Service::create(&db.pool, new_service(Category::Manicure, "Маникюр В", 1200)).await?;

    let manicure = Service::find_by_category(&db.pool, Category::Manicure).await?;
    assert_eq!(manicure.len(), 2);
    assert!(manicure.iter().all(|s| s.category == Category::Manicure.label()));

    let all = Service::list_all(&db.pool).await?;
    assert_eq!(all.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_master_affinity() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let a = Service::create(&db.pool, new_service(Category::Manicure, "A", 1000)).await?;
    let b = Service::create(&db.pool, new_service(Category::Manicure, "B", 1000)).await?;

    let anna = Master::create(&db.pool, "Анна", Some("+79990000001"), &[a.id, b.id]).await?;
    Master::create(&db.pool, "Ольга", None, &[b.id]).await?;

    assert_eq!(anna.service_ids(), vec![a.id, b.id]);

    let for_a = Master::find_for_service(&db.pool, a.id).await?;
    assert_eq!(for_a.len(), 1);
    assert_eq!(for_a[0].name, "Анна");
    assert_eq!(Master::find_for_service(&db.pool, b.id).await?.len(), 2);

    assert!(Master::update(&db.pool, anna.id, "Анна К.", &[b.id]).await?);
    assert!(Master::find_for_service(&db.pool, a.id).await?.is_empty());

    let updated = Master::find_by_id(&db.pool, anna.id).await?.unwrap();
    assert_eq!(updated.name, "Анна К.");
    assert_eq!(updated.phone.as_deref(), Some("+79990000001"));

    assert!(Master::delete(&db.pool, anna.id).await?);
    assert_eq!(Master::count(&db.pool).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_client_register_keeps_phone() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let client = Client::register(&db.pool, 42, Some("Ирина"), None).await?;
    assert!(client.phone.is_none());

    let with_phone = Client::record_phone(&db.pool, 42, Some("Ирина"), Some("irina"), "+79991234567").await?;
    assert_eq!(with_phone.id, client.id);
    assert_eq!(with_phone.phone.as_deref(), Some("+79991234567"));

    // A later /start must not erase the phone
    let again = Client::register(&db.pool, 42, Some("Ира"), Some("irina")).await?;
    assert_eq!(again.id, client.id);
    assert_eq!(again.first_name.as_deref(), Some("Ира"));
    assert_eq!(again.phone.as_deref(), Some("+79991234567"));

    Client::register(&db.pool, 43, Some("Олег"), None).await?;
    assert_eq!(Client::recipient_ids(&db.pool).await?, vec![42, 43]);

    Ok(())
}

#[tokio::test]
async fn test_orders_and_client_summaries() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let service = Service::create(&db.pool, new_service(Category::Manicure, "Гель-лак", 2000)).await?;
    let client = Client::record_phone(&db.pool, 42, Some("Ирина"), None, "+79991234567").await?;
    Client::register(&db.pool, 43, Some("Олег"), None).await?;

    let first = Order::create(&db.pool, client.id, service.id, "Анна").await?;
    let second = Order::create(&db.pool, client.id, service.id, "Любой мастер").await?;
    assert_eq!(first.status, OrderStatus::Pending.as_str());
    assert_eq!(Order::count(&db.pool).await?, 2);
    assert_eq!(Order::count_by_status(&db.pool, OrderStatus::Pending).await?, 2);

    assert!(Order::update_status(&db.pool, first.id, OrderStatus::Confirmed).await?);
    assert!(!Order::update_status(&db.pool, 9999, OrderStatus::Confirmed).await?);
    assert_eq!(Order::count_by_status(&db.pool, OrderStatus::Pending).await?, 1);

    let details = Order::list_details(&db.pool).await?;
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].id, second.id);
    assert_eq!(details[1].status_label(), "Подтверждена");
    assert_eq!(details[1].service_name.as_deref(), Some("Гель-лак"));
    assert_eq!(details[1].phone.as_deref(), Some("+79991234567"));

    // Orders survive the deletion of their service
    Service::delete(&db.pool, service.id).await?;
    let details = Order::list_details(&db.pool).await?;
    assert_eq!(details.len(), 2);
    assert!(details.iter().all(|d| d.service_name.is_none()));

    let summaries = Client::list_summaries(&db.pool, None).await?;
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].order_count, 2);
    assert_eq!(summaries[1].order_count, 0);

    let future = Client::list_summaries(&db.pool, Some(Utc::now() + Duration::days(1))).await?;
    assert!(future.is_empty());
    let recent = Client::list_summaries(&db.pool, Some(Utc::now() - Duration::days(1))).await?;
    assert_eq!(recent.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_settings_get_or_default_and_upsert() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert!(Setting::get(&db.pool, setting::WEBSITE_URL).await?.is_none());
    assert_eq!(
        Setting::get_or(&db.pool, setting::WEBSITE_URL, "https://default").await?,
        "https://default"
    );

    Setting::update(&db.pool, setting::WEBSITE_URL, "https://one").await?;
    Setting::update(&db.pool, setting::WEBSITE_URL, "https://two").await?;
    assert_eq!(
        Setting::get_or(&db.pool, setting::WEBSITE_URL, "https://default").await?,
        "https://two"
    );

    // insert_default never overwrites
    Setting::insert_default(&db.pool, setting::WEBSITE_URL, "https://three").await?;
    assert_eq!(
        Setting::get(&db.pool, setting::WEBSITE_URL).await?.as_deref(),
        Some("https://two")
    );

    Ok(())
}
