//! Client booking conversation: category → service → master → phone.

use anyhow::Result;
use tracing::{info, warn};

use crate::bot::context::{AppContext, ChatUser};
use crate::bot::dialogue::State;
use crate::bot::menu;
use crate::bot::reply::{Outgoing, Transition};
use crate::database::models::{setting, Category, Client, Master, Order, Service, Setting};
use crate::services::notifier::{notify_admins, NewOrderNotice};
use crate::services::price_list;
use crate::utils::feedback;
use crate::utils::validation::normalize_phone;

/// `/start`: registers the sender as a known client and shows the main menu.
pub async fn start(ctx: &AppContext, user: &ChatUser) -> Result<Transition> {
    Client::register(
        &ctx.db.pool,
        user.id,
        Some(user.first_name.as_str()),
        user.username.as_deref(),
    )
    .await?;

    let welcome = Setting::get_or(
        &ctx.db.pool,
        setting::WELCOME_MESSAGE,
        setting::DEFAULT_WELCOME_MESSAGE,
    )
    .await?;

    let mut text = format!("{welcome}\n\nВыберите категорию услуг:");
    if ctx.is_admin(user) {
        text.push_str("\n\nДля управления студией используйте /admin");
    }

    Ok(Transition::to(State::Start).say_with(text, menu::main_menu()))
}

/// `/help` keeps the current state.
pub fn help(ctx: &AppContext, state: State) -> Transition {
    Transition::to(state).say(format!(
        "Для записи на услугу нажмите /start и следуйте инструкциям.\n\
        Чтобы прервать запись, отправьте /cancel.\n\n\
        Если у вас возникли проблемы, свяжитесь с нами по телефону: {}",
        ctx.config.studio_phone
    ))
}

/// `/cancel` or the cancel button: back to the main menu with scratch data dropped.
pub fn cancel() -> Transition {
    Transition::to(State::Start).say_with(
        feedback::error("Действие отменено. Для новой записи выберите категорию."),
        menu::main_menu(),
    )
}

/// Handles free text in any non-admin state.
pub async fn handle(ctx: &AppContext, state: State, user: &ChatUser, text: &str) -> Result<Transition> {
    match state {
        State::Start => main_menu_input(ctx, text).await,
        State::ChoosingService { category } => choosing_service(ctx, category, text).await,
        State::ChoosingMaster { category, service_id } => {
            choosing_master(ctx, category, service_id, text).await
        }
        State::EnteringPhone { category, service_id, master } => {
            entering_phone(ctx, user, category, service_id, master, text).await
        }
        State::Admin(_) => Ok(Transition::to(State::Start).say_with(
            "Используйте кнопки меню для навигации.",
            menu::main_menu(),
        )),
    }
}

async fn main_menu_input(ctx: &AppContext, text: &str) -> Result<Transition> {
    if let Some(category) = Category::from_label(text) {
        return show_services(ctx, category).await;
    }

    match text {
        menu::PRICE_LIST => price_list_reply(ctx, State::Start).await,
        menu::WEBSITE => {
            let url = Setting::get_or(&ctx.db.pool, setting::WEBSITE_URL, &ctx.config.website_url).await?;
            Ok(Transition::to(State::Start).say(format!("🌐 Наш сайт: {url}")))
        }
        menu::CHANNEL => {
            let url = Setting::get_or(
                &ctx.db.pool,
                setting::TELEGRAM_CHANNEL,
                &ctx.config.telegram_channel,
            )
            .await?;
            Ok(Transition::to(State::Start).say(format!("📢 Наш телеграм-канал: {url}")))
        }
        menu::LOCATION => {
            let (latitude, longitude) = studio_location(ctx).await?;
            Ok(Transition::to(State::Start)
                .say("📍 Наш адрес на карте:")
                .reply(Outgoing::Location { latitude, longitude }))
        }
        menu::BACK => Ok(Transition::to(State::Start).say_with("Главное меню:", menu::main_menu())),
        _ => Ok(Transition::to(State::Start).say_with(
            "Используйте кнопки меню для навигации или нажмите /start для начала работы с ботом.",
            menu::main_menu(),
        )),
    }
}

/// Coordinates from settings, falling back to configuration when unset or unparsable.
async fn studio_location(ctx: &AppContext) -> Result<(f64, f64)> {
    let lat = Setting::get(&ctx.db.pool, setting::LOCATION_LAT)
        .await?
        .and_then(|value| value.parse().ok())
        .unwrap_or(ctx.config.location_lat);
    let lon = Setting::get(&ctx.db.pool, setting::LOCATION_LON)
        .await?
        .and_then(|value| value.parse().ok())
        .unwrap_or(ctx.config.location_lon);
    Ok((lat, lon))
}

/// Service menu restricted to one category. An empty category stays on the main menu.
async fn show_services(ctx: &AppContext, category: Category) -> Result<Transition> {
    let services = Service::find_by_category(&ctx.db.pool, category).await?;

    if services.is_empty() {
        return Ok(Transition::to(State::Start)
            .say_with("В этой категории пока нет услуг.", menu::main_menu()));
    }

    Ok(Transition::to(State::ChoosingService { category })
        .say_with("Выберите услугу:", menu::services_menu(&services)))
}

async fn choosing_service(ctx: &AppContext, category: Category, text: &str) -> Result<Transition> {
    if text == menu::BACK {
        return Ok(Transition::to(State::Start)
            .say_with("Выберите категорию услуг:", menu::main_menu()));
    }

    let services = Service::find_by_category(&ctx.db.pool, category).await?;
    let Some(service) = services.iter().find(|service| service.menu_label() == text) else {
        if services.is_empty() {
            return Ok(Transition::to(State::Start)
                .say_with("В этой категории пока нет услуг.", menu::main_menu()));
        }
        return Ok(Transition::to(State::ChoosingService { category }).say_with(
            "Пожалуйста, выберите услугу из списка.",
            menu::services_menu(&services),
        ));
    };

    let options = master_options(ctx, service).await?;
    Ok(Transition::to(State::ChoosingMaster { category, service_id: service.id }).say_with(
        format!(
            "Вы выбрали: {}\nЦена: {} руб.\nДлительность: {} мин.\n\nВыберите мастера:",
            service.name, service.price, service.duration
        ),
        menu::masters_menu(&options),
    ))
}

/// Masters offered for a service: those with the service in their affinity
/// list plus the directly assigned master, or a single "any master" option.
pub async fn master_options(ctx: &AppContext, service: &Service) -> Result<Vec<String>> {
    let mut names: Vec<String> = Master::find_for_service(&ctx.db.pool, service.id)
        .await?
        .into_iter()
        .map(|master| master.name)
        .collect();

    if let Some(master_id) = service.master_id {
        if let Some(master) = Master::find_by_id(&ctx.db.pool, master_id).await? {
            if !names.contains(&master.name) {
                names.push(master.name);
            }
        }
    }

    if names.is_empty() {
        names.push(menu::ANY_MASTER.to_string());
    }

    Ok(names)
}

fn service_gone() -> Transition {
    Transition::to(State::Start).say_with(
        feedback::warning("Эта услуга больше недоступна. Пожалуйста, выберите другую."),
        menu::main_menu(),
    )
}

async fn choosing_master(
    ctx: &AppContext,
    category: Category,
    service_id: i64,
    text: &str,
) -> Result<Transition> {
    if text == menu::BACK {
        return show_services(ctx, category).await;
    }

    let Some(service) = Service::find_by_id(&ctx.db.pool, service_id).await? else {
        return Ok(service_gone());
    };

    let options = master_options(ctx, &service).await?;
    if !options.iter().any(|name| name == text) {
        return Ok(Transition::to(State::ChoosingMaster { category, service_id })
            .say_with("Пожалуйста, выберите мастера из списка.", menu::masters_menu(&options)));
    }

    Ok(Transition::to(State::EnteringPhone {
        category,
        service_id,
        master: text.to_string(),
    })
    .say_with("Введите ваш номер телефона для связи:", menu::phone_menu()))
}

async fn entering_phone(
    ctx: &AppContext,
    user: &ChatUser,
    category: Category,
    service_id: i64,
    master: String,
    text: &str,
) -> Result<Transition> {
    if text == menu::BACK {
        let Some(service) = Service::find_by_id(&ctx.db.pool, service_id).await? else {
            return Ok(service_gone());
        };
        let options = master_options(ctx, &service).await?;
        return Ok(Transition::to(State::ChoosingMaster { category, service_id })
            .say_with("Выберите мастера:", menu::masters_menu(&options)));
    }

    let phone = match normalize_phone(text) {
        Ok(phone) => phone,
        Err(e) => {
            tracing::debug!("Rejected phone input from user {}: {}", user.id, e);
            return Ok(Transition::to(State::EnteringPhone { category, service_id, master })
                .say_with(
                    feedback::validation_error(
                        "Пожалуйста, введите корректный номер телефона.",
                        "Например: +79991234567 или 8 (999) 123-45-67",
                    ),
                    menu::phone_menu(),
                ));
        }
    };

    complete_booking(ctx, user, service_id, &master, &phone).await
}

/// Persists the order, notifies every administrator and confirms to the client.
pub async fn complete_booking(
    ctx: &AppContext,
    user: &ChatUser,
    service_id: i64,
    master: &str,
    phone: &str,
) -> Result<Transition> {
    let Some(service) = Service::find_by_id(&ctx.db.pool, service_id).await? else {
        return Ok(service_gone());
    };

    let client = Client::record_phone(
        &ctx.db.pool,
        user.id,
        Some(user.first_name.as_str()),
        user.username.as_deref(),
        phone,
    )
    .await?;

    let order = Order::create(&ctx.db.pool, client.id, service.id, master).await?;

    let notice = NewOrderNotice {
        order_id: order.id,
        client_name: &user.first_name,
        phone,
        category: &service.category,
        service_name: &service.name,
        price: service.price,
        duration: service.duration,
        master_name: master,
    }
    .render();

    if ctx.config.admin_ids.is_empty() {
        warn!("Order {} created but no administrators are configured", order.id);
    }
    let report = notify_admins(ctx.messenger.as_ref(), &ctx.config.admin_ids, &notice).await;

    info!(
        "Order {} created for client {} ({}): {} / {}; admin notifications {} delivered, {} failed",
        order.id, client.id, user.id, service.name, master, report.delivered, report.failed
    );

    Ok(Transition::to(State::Start).say_with(
        feedback::success(&format!(
            "Ваша заявка №{} принята! Наш администратор свяжется с вами в ближайшее время для уточнения деталей.",
            order.id
        )),
        menu::main_menu(),
    ))
}

/// Sends the price-list PDF, staying in `next`.
pub async fn price_list_reply(ctx: &AppContext, next: State) -> Result<Transition> {
    match price_list::generate(&ctx.db, &ctx.config).await {
        Ok(Some(bytes)) => Ok(Transition::to(next).reply(Outgoing::Document {
            file_name: price_list::PRICE_LIST_FILE_NAME.to_string(),
            caption: "Прайс-лист услуг нашей студии".to_string(),
            bytes,
        })),
        Ok(None) => Ok(Transition::to(next).say("Прайс-лист пока недоступен: услуг нет.")),
        Err(e) => {
            tracing::error!("Failed to generate price list: {}", e);
            Ok(Transition::to(next)
                .say(feedback::error("Произошла ошибка при генерации прайс-листа. Попробуйте позже.")))
        }
    }
}
