//! Administration conversation. Access is checked by the caller on every input.

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::bot::booking;
use crate::bot::context::{AppContext, ChatUser};
use crate::bot::dialogue::{AdminState, SettingField, State};
use crate::bot::menu;
use crate::bot::reply::Transition;
use crate::database::models::{
    setting, Category, Client, ClientSummary, Master, NewService, Order, OrderDetails, OrderStatus,
    Service, Setting,
};
use crate::services::notifier::broadcast;
use crate::utils::feedback;
use crate::utils::logging::log_access_denied;
use crate::utils::text::{split_message, TELEGRAM_MESSAGE_LIMIT};
use crate::utils::validation::{
    normalize_phone, parse_id, parse_id_list, parse_latitude, parse_longitude,
    parse_master_details, parse_service_details, validate_duration, validate_master_name,
    validate_price, validate_service_name, validate_text,
};

/// Window for the "new clients" counter in the client list.
const RECENT_CLIENTS_DAYS: i64 = 30;

fn to(state: AdminState) -> Transition {
    Transition::to(State::Admin(state))
}

fn menu_transition(text: impl Into<String>) -> Transition {
    to(AdminState::Menu).say_with(text, menu::admin_menu())
}

/// `/admin`: opens the panel for allow-listed users only.
pub fn enter(ctx: &AppContext, user: &ChatUser) -> Transition {
    if !ctx.is_admin(user) {
        log_access_denied(&user.display_name(), user.id, "admin");
        return Transition::to(State::Start).say_with(
            feedback::error("У вас нет доступа к панели администратора."),
            menu::main_menu(),
        );
    }

    info!("Admin {} ({}) opened the admin panel", user.display_name(), user.id);
    menu_transition("👑 Панель администратора\n\nВыберите действие:")
}

/// Runs one admin panel step. The caller has already checked the allow-list.
pub async fn handle(
    ctx: &AppContext,
    state: AdminState,
    user: &ChatUser,
    text: &str,
) -> Result<Transition> {
    if text == menu::ADMIN_BACK {
        return Ok(menu_transition("Панель администратора:"));
    }

    match state {
        AdminState::Menu => admin_menu_input(ctx, text).await,

        AdminState::ServicesMenu => services_menu_input(ctx, text).await,
        AdminState::AddServiceCategory => Ok(add_service_category(text)),
        AdminState::AddServiceName { category } => Ok(add_service_name(category, text)),
        AdminState::AddServicePrice { category, name } => Ok(add_service_price(category, name, text)),
        AdminState::AddServiceDuration { category, name, price } => {
            add_service_duration(ctx, user, category, name, price, text).await
        }
        AdminState::EditServiceSelect => edit_service_select(ctx, text).await,
        AdminState::EditServiceDetails { service_id } => {
            edit_service_details(ctx, user, service_id, text).await
        }
        AdminState::DeleteServiceSelect => delete_service_select(ctx, text).await,
        AdminState::DeleteServiceConfirm { service_id } => {
            delete_service_confirm(ctx, user, service_id, text).await
        }

        AdminState::MastersMenu => masters_menu_input(ctx, text).await,
        AdminState::AddMasterName => Ok(add_master_name(text)),
        AdminState::AddMasterPhone { name } => add_master_phone(ctx, name, text).await,
        AdminState::AddMasterServices { name, phone } => {
            add_master_services(ctx, user, name, phone, text).await
        }
        AdminState::EditMasterSelect => edit_master_select(ctx, text).await,
        AdminState::EditMasterDetails { master_id } => {
            edit_master_details(ctx, user, master_id, text).await
        }
        AdminState::DeleteMasterSelect => delete_master_select(ctx, text).await,
        AdminState::DeleteMasterConfirm { master_id } => {
            delete_master_confirm(ctx, user, master_id, text).await
        }

        AdminState::Broadcast => send_broadcast(ctx, user, text).await,

        AdminState::OrderStatusSelect => order_status_select(ctx, text).await,
        AdminState::OrderStatusChoose { order_id } => {
            order_status_choose(ctx, user, order_id, text).await
        }

        AdminState::SettingsMenu => settings_menu_input(ctx, text).await,
        AdminState::EditSetting { field } => edit_setting(ctx, user, field, text).await,
        AdminState::EditLocationLat => Ok(edit_location_lat(text)),
        AdminState::EditLocationLon { lat } => edit_location_lon(ctx, user, lat, text).await,
    }
}

async fn admin_menu_input(ctx: &AppContext, text: &str) -> Result<Transition> {
    match text {
        menu::ADMIN_SERVICES => {
            let services = Service::list_all(&ctx.db.pool).await?;
            Ok(to(AdminState::ServicesMenu).say_with(
                format!("🛠 Услуги\n\n{}", service_list(&services)),
                menu::services_admin_menu(),
            ))
        }
        menu::ADMIN_MASTERS => {
            let masters = Master::list_all(&ctx.db.pool).await?;
            Ok(to(AdminState::MastersMenu).say_with(
                format!("👩‍🎨 Мастера\n\n{}", master_list(&masters)),
                menu::masters_admin_menu(),
            ))
        }
        menu::ADMIN_CLIENTS => client_report(ctx).await,
        menu::ADMIN_ORDERS => order_report(ctx).await,
        menu::ADMIN_ORDER_STATUS => {
            if Order::count(&ctx.db.pool).await? == 0 {
                return Ok(menu_transition("Заказов пока нет."));
            }
            Ok(to(AdminState::OrderStatusSelect)
                .say_with("Введите номер заказа:", menu::admin_input_menu()))
        }
        menu::ADMIN_BROADCAST => Ok(to(AdminState::Broadcast).say_with(
            "Введите текст сообщения для рассылки всем клиентам:",
            menu::admin_input_menu(),
        )),
        menu::ADMIN_SETTINGS => settings_overview(ctx).await,
        menu::PRICE_LIST => booking::price_list_reply(ctx, State::Admin(AdminState::Menu)).await,
        menu::ADMIN_EXIT => Ok(Transition::to(State::Start)
            .say_with("Вы вышли из панели администратора.", menu::main_menu())),
        _ => Ok(menu_transition("Используйте кнопки меню администратора.")),
    }
}

fn service_list(services: &[Service]) -> String {
    if services.is_empty() {
        return "Услуг пока нет.".to_string();
    }
    services
        .iter()
        .map(|service| format!("{}, {} мин.", service.admin_line(), service.duration))
        .collect::<Vec<_>>()
        .join("\n")
}

fn master_list(masters: &[Master]) -> String {
    if masters.is_empty() {
        return "Мастеров пока нет.".to_string();
    }
    masters
        .iter()
        .map(Master::admin_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Long reports are split to respect the message size limit.
fn report(header: String, body: String) -> Transition {
    let text = format!("{header}\n\n{body}");
    let chunks = split_message(&text, TELEGRAM_MESSAGE_LIMIT);
    let last = chunks.len().saturating_sub(1);

    chunks
        .into_iter()
        .enumerate()
        .fold(to(AdminState::Menu), |transition, (idx, chunk)| {
            if idx == last {
                transition.say_with(chunk, menu::admin_menu())
            } else {
                transition.say(chunk)
            }
        })
}

fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

/// One line of the client report.
pub fn client_line(client: &ClientSummary) -> String {
    format!(
        "{}. {} | {} | заказов: {} | с {}",
        client.id,
        client.first_name.as_deref().unwrap_or("—"),
        client.phone.as_deref().unwrap_or("нет телефона"),
        client.order_count,
        date_part(&client.created_at),
    )
}

/// Multi-line order card used in the order report.
pub fn order_block(order: &OrderDetails) -> String {
    let price = order
        .price
        .map(|price| format!("{price} руб."))
        .unwrap_or_else(|| "—".to_string());

    format!(
        "№{} от {}\nКлиент: {}, {}\nУслуга: {} ({}), {}\nМастер: {}\nСтатус: {}",
        order.id,
        date_part(&order.created_at),
        order.client_name.as_deref().unwrap_or("—"),
        order.phone.as_deref().unwrap_or("—"),
        order.service_name.as_deref().unwrap_or("услуга удалена"),
        order.category.as_deref().unwrap_or("—"),
        price,
        order.master_name,
        order.status_label(),
    )
}

async fn client_report(ctx: &AppContext) -> Result<Transition> {
    let clients = Client::list_summaries(&ctx.db.pool, None).await?;
    if clients.is_empty() {
        return Ok(menu_transition("Клиентов пока нет."));
    }

    let since = Utc::now() - Duration::days(RECENT_CLIENTS_DAYS);
    let recent = Client::list_summaries(&ctx.db.pool, Some(since)).await?.len();

    let body = clients.iter().map(client_line).collect::<Vec<_>>().join("\n");
    Ok(report(
        format!(
            "👥 Клиенты: {} (новых за {} дней: {})",
            clients.len(),
            RECENT_CLIENTS_DAYS,
            recent
        ),
        body,
    ))
}

async fn order_report(ctx: &AppContext) -> Result<Transition> {
    let orders = Order::list_details(&ctx.db.pool).await?;
    if orders.is_empty() {
        return Ok(menu_transition("Заказов пока нет."));
    }

    let pending = Order::count_by_status(&ctx.db.pool, OrderStatus::Pending).await?;
    let body = orders.iter().map(order_block).collect::<Vec<_>>().join("\n\n");
    Ok(report(
        format!("📋 Заказы: {} (ожидают: {})", orders.len(), pending),
        body,
    ))
}

// Services

async fn services_menu_input(ctx: &AppContext, text: &str) -> Result<Transition> {
    match text {
        menu::ADD_SERVICE => Ok(to(AdminState::AddServiceCategory)
            .say_with("Выберите категорию новой услуги:", menu::admin_categories_menu())),
        menu::EDIT_SERVICE | menu::DELETE_SERVICE => {
            let services = Service::list_all(&ctx.db.pool).await?;
            if services.is_empty() {
                return Ok(to(AdminState::ServicesMenu)
                    .say_with("Услуг пока нет.", menu::services_admin_menu()));
            }
            let (next, action) = if text == menu::EDIT_SERVICE {
                (AdminState::EditServiceSelect, "редактирования")
            } else {
                (AdminState::DeleteServiceSelect, "удаления")
            };
            Ok(to(next).say_with(
                format!("{}\n\nВведите ID услуги для {}:", service_list(&services), action),
                menu::admin_input_menu(),
            ))
        }
        _ => Ok(to(AdminState::ServicesMenu)
            .say_with("Выберите действие:", menu::services_admin_menu())),
    }
}

fn add_service_category(text: &str) -> Transition {
    match Category::from_label(text) {
        Some(category) => to(AdminState::AddServiceName { category })
            .say_with("Введите название услуги:", menu::admin_input_menu()),
        None => to(AdminState::AddServiceCategory).say_with(
            "Пожалуйста, выберите категорию из списка.",
            menu::admin_categories_menu(),
        ),
    }
}

fn add_service_name(category: Category, text: &str) -> Transition {
    match validate_service_name(text) {
        Ok(name) => to(AdminState::AddServicePrice { category, name })
            .say_with("Введите цену услуги (в рублях):", menu::admin_input_menu()),
        Err(e) => {
            debug!("Rejected service name: {}", e);
            to(AdminState::AddServiceName { category }).say_with(
                feedback::validation_error(
                    "Некорректное название услуги.",
                    "Название не должно быть пустым, длиннее 100 символов или содержать запятые и \" - \".",
                ),
                menu::admin_input_menu(),
            )
        }
    }
}

fn add_service_price(category: Category, name: String, text: &str) -> Transition {
    match validate_price(text) {
        Ok(price) => to(AdminState::AddServiceDuration { category, name, price })
            .say_with("Введите длительность услуги (в минутах):", menu::admin_input_menu()),
        Err(e) => {
            debug!("Rejected service price: {}", e);
            to(AdminState::AddServicePrice { category, name }).say_with(
                feedback::validation_error(
                    "Пожалуйста, введите корректную цену.",
                    "Цена указывается целым числом рублей, например: 1500",
                ),
                menu::admin_input_menu(),
            )
        }
    }
}

async fn add_service_duration(
    ctx: &AppContext,
    user: &ChatUser,
    category: Category,
    name: String,
    price: i64,
    text: &str,
) -> Result<Transition> {
    let duration = match validate_duration(text) {
        Ok(duration) => duration,
        Err(e) => {
            debug!("Rejected service duration: {}", e);
            return Ok(to(AdminState::AddServiceDuration { category, name, price }).say_with(
                feedback::validation_error(
                    "Пожалуйста, введите корректную длительность.",
                    "Длительность указывается в минутах, например: 90",
                ),
                menu::admin_input_menu(),
            ));
        }
    };

    let service = Service::create(
        &ctx.db.pool,
        NewService {
            category,
            name,
            price,
            duration,
            master_id: None,
        },
    )
    .await?;

    info!("Admin {} added service {} ({})", user.id, service.id, service.name);
    Ok(to(AdminState::ServicesMenu).say_with(
        feedback::success(&format!("Услуга «{}» добавлена (ID {}).", service.name, service.id)),
        menu::services_admin_menu(),
    ))
}

fn invalid_id(state: AdminState, what: &str) -> Transition {
    to(state).say_with(
        feedback::validation_error(&format!("Некорректный ID {what}."), "Введите число из списка."),
        menu::admin_input_menu(),
    )
}

fn not_found(state: AdminState, what: &str, id: i64) -> Transition {
    to(state).say_with(
        feedback::warning(&format!("{what} с ID {id} не найден(а).")),
        menu::admin_input_menu(),
    )
}

async fn edit_service_select(ctx: &AppContext, text: &str) -> Result<Transition> {
    let Ok(service_id) = parse_id(text) else {
        return Ok(invalid_id(AdminState::EditServiceSelect, "услуги"));
    };
    let Some(service) = Service::find_by_id(&ctx.db.pool, service_id).await? else {
        return Ok(not_found(AdminState::EditServiceSelect, "Услуга", service_id));
    };

    let master = match service.master_id {
        Some(master_id) => Master::find_by_id(&ctx.db.pool, master_id)
            .await?
            .map(|master| master.admin_line())
            .unwrap_or_else(|| format!("ID {master_id} (удалён)")),
        None => "не назначен".to_string(),
    };

    Ok(to(AdminState::EditServiceDetails { service_id }).say_with(
        format!(
            "Текущие данные: {}, {} мин.\nМастер: {}\n\n\
            Введите новые данные в формате:\n\
            категория, название, цена, длительность[, ID мастера]\n\
            Например: Маникюр, Гель-лак, 2000, 90, 2",
            service.admin_line(),
            service.duration,
            master
        ),
        menu::admin_input_menu(),
    ))
}

async fn edit_service_details(
    ctx: &AppContext,
    user: &ChatUser,
    service_id: i64,
    text: &str,
) -> Result<Transition> {
    let details = match parse_service_details(text) {
        Ok(details) => details,
        Err(e) => {
            debug!("Rejected service details: {}", e);
            return Ok(to(AdminState::EditServiceDetails { service_id }).say_with(
                feedback::validation_error(
                    "Не удалось разобрать данные услуги.",
                    "Формат: категория, название, цена, длительность[, ID мастера]",
                ),
                menu::admin_input_menu(),
            ));
        }
    };

    if let Some(master_id) = details.master_id {
        if Master::find_by_id(&ctx.db.pool, master_id).await?.is_none() {
            return Ok(to(AdminState::EditServiceDetails { service_id }).say_with(
                feedback::validation_error(
                    &format!("Мастер с ID {master_id} не найден."),
                    "Укажите ID существующего мастера или уберите его из строки.",
                ),
                menu::admin_input_menu(),
            ));
        }
    }

    let updated = Service::update(
        &ctx.db.pool,
        service_id,
        details.category,
        &details.name,
        details.price,
        details.duration,
        details.master_id,
    )
    .await?;

    let text = if updated {
        info!("Admin {} updated service {}", user.id, service_id);
        feedback::success(&format!("Услуга «{}» обновлена.", details.name))
    } else {
        feedback::warning("Услуга не найдена, возможно она уже удалена.")
    };
    Ok(to(AdminState::ServicesMenu).say_with(text, menu::services_admin_menu()))
}

async fn delete_service_select(ctx: &AppContext, text: &str) -> Result<Transition> {
    let Ok(service_id) = parse_id(text) else {
        return Ok(invalid_id(AdminState::DeleteServiceSelect, "услуги"));
    };
    let Some(service) = Service::find_by_id(&ctx.db.pool, service_id).await? else {
        return Ok(not_found(AdminState::DeleteServiceSelect, "Услуга", service_id));
    };

    Ok(to(AdminState::DeleteServiceConfirm { service_id }).say_with(
        format!("Удалить услугу «{}»?", service.name),
        menu::confirm_menu(),
    ))
}

async fn delete_service_confirm(
    ctx: &AppContext,
    user: &ChatUser,
    service_id: i64,
    text: &str,
) -> Result<Transition> {
    match text {
        menu::YES => {
            let text = if Service::delete(&ctx.db.pool, service_id).await? {
                info!("Admin {} deleted service {}", user.id, service_id);
                feedback::success("Услуга удалена.")
            } else {
                feedback::warning("Услуга не найдена, возможно она уже удалена.")
            };
            Ok(to(AdminState::ServicesMenu).say_with(text, menu::services_admin_menu()))
        }
        menu::NO => Ok(to(AdminState::ServicesMenu)
            .say_with(feedback::info("Удаление отменено."), menu::services_admin_menu())),
        _ => Ok(to(AdminState::DeleteServiceConfirm { service_id })
            .say_with("Ответьте «Да» или «Нет».", menu::confirm_menu())),
    }
}

// Masters

async fn masters_menu_input(ctx: &AppContext, text: &str) -> Result<Transition> {
    match text {
        menu::ADD_MASTER => Ok(to(AdminState::AddMasterName)
            .say_with("Введите имя мастера:", menu::admin_input_menu())),
        menu::EDIT_MASTER | menu::DELETE_MASTER => {
            let masters = Master::list_all(&ctx.db.pool).await?;
            if masters.is_empty() {
                return Ok(to(AdminState::MastersMenu)
                    .say_with("Мастеров пока нет.", menu::masters_admin_menu()));
            }
            let (next, action) = if text == menu::EDIT_MASTER {
                (AdminState::EditMasterSelect, "редактирования")
            } else {
                (AdminState::DeleteMasterSelect, "удаления")
            };
            Ok(to(next).say_with(
                format!("{}\n\nВведите ID мастера для {}:", master_list(&masters), action),
                menu::admin_input_menu(),
            ))
        }
        _ => Ok(to(AdminState::MastersMenu)
            .say_with("Выберите действие:", menu::masters_admin_menu())),
    }
}

fn add_master_name(text: &str) -> Transition {
    match validate_master_name(text) {
        Ok(name) => to(AdminState::AddMasterPhone { name })
            .say_with("Введите телефон мастера:", menu::admin_input_menu()),
        Err(e) => {
            debug!("Rejected master name: {}", e);
            to(AdminState::AddMasterName).say_with(
                feedback::validation_error(
                    "Некорректное имя мастера.",
                    "Имя не должно быть пустым, длиннее 100 символов или содержать запятые.",
                ),
                menu::admin_input_menu(),
            )
        }
    }
}

async fn add_master_phone(ctx: &AppContext, name: String, text: &str) -> Result<Transition> {
    let phone = match normalize_phone(text) {
        Ok(phone) => phone,
        Err(e) => {
            debug!("Rejected master phone: {}", e);
            return Ok(to(AdminState::AddMasterPhone { name }).say_with(
                feedback::validation_error(
                    "Некорректный номер телефона.",
                    "Например: +79991234567 или 8 (999) 123-45-67",
                ),
                menu::admin_input_menu(),
            ));
        }
    };

    let services = Service::list_all(&ctx.db.pool).await?;
    Ok(to(AdminState::AddMasterServices { name, phone }).say_with(
        format!(
            "{}\n\nВведите ID услуг, которые выполняет мастер, через запятую:",
            service_list(&services)
        ),
        menu::admin_input_menu(),
    ))
}

/// Ids from `service_ids` that do not exist in the catalogue.
async fn missing_services(ctx: &AppContext, service_ids: &[i64]) -> Result<Vec<i64>> {
    let mut missing = Vec::new();
    for &service_id in service_ids {
        if Service::find_by_id(&ctx.db.pool, service_id).await?.is_none() {
            missing.push(service_id);
        }
    }
    Ok(missing)
}

fn unknown_services_message(missing: &[i64]) -> String {
    let ids = missing
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    feedback::validation_error(
        &format!("Услуги с ID {ids} не найдены."),
        "Укажите ID существующих услуг через запятую.",
    )
}

async fn add_master_services(
    ctx: &AppContext,
    user: &ChatUser,
    name: String,
    phone: String,
    text: &str,
) -> Result<Transition> {
    let service_ids = match parse_id_list(text) {
        Ok(ids) => ids,
        Err(e) => {
            debug!("Rejected service id list: {}", e);
            return Ok(to(AdminState::AddMasterServices { name, phone }).say_with(
                feedback::validation_error(
                    "Некорректный список услуг.",
                    "Введите ID услуг через запятую, например: 1, 2",
                ),
                menu::admin_input_menu(),
            ));
        }
    };

    let missing = missing_services(ctx, &service_ids).await?;
    if !missing.is_empty() {
        return Ok(to(AdminState::AddMasterServices { name, phone })
            .say_with(unknown_services_message(&missing), menu::admin_input_menu()));
    }

    let master = Master::create(&ctx.db.pool, &name, Some(phone.as_str()), &service_ids).await?;

    info!("Admin {} added master {} ({})", user.id, master.id, master.name);
    Ok(to(AdminState::MastersMenu).say_with(
        feedback::success(&format!("Мастер {} добавлен (ID {}).", master.name, master.id)),
        menu::masters_admin_menu(),
    ))
}

async fn edit_master_select(ctx: &AppContext, text: &str) -> Result<Transition> {
    let Ok(master_id) = parse_id(text) else {
        return Ok(invalid_id(AdminState::EditMasterSelect, "мастера"));
    };
    let Some(master) = Master::find_by_id(&ctx.db.pool, master_id).await? else {
        return Ok(not_found(AdminState::EditMasterSelect, "Мастер", master_id));
    };

    Ok(to(AdminState::EditMasterDetails { master_id }).say_with(
        format!(
            "Текущие данные: {}\n\n\
            Введите новые данные в формате:\n\
            имя, ID услуг через запятую\n\
            Например: Анна, 1, 2",
            master.admin_line()
        ),
        menu::admin_input_menu(),
    ))
}

async fn edit_master_details(
    ctx: &AppContext,
    user: &ChatUser,
    master_id: i64,
    text: &str,
) -> Result<Transition> {
    let (name, service_ids) = match parse_master_details(text) {
        Ok(details) => details,
        Err(e) => {
            debug!("Rejected master details: {}", e);
            return Ok(to(AdminState::EditMasterDetails { master_id }).say_with(
                feedback::validation_error(
                    "Не удалось разобрать данные мастера.",
                    "Формат: имя, ID услуг через запятую",
                ),
                menu::admin_input_menu(),
            ));
        }
    };

    let missing = missing_services(ctx, &service_ids).await?;
    if !missing.is_empty() {
        return Ok(to(AdminState::EditMasterDetails { master_id })
            .say_with(unknown_services_message(&missing), menu::admin_input_menu()));
    }

    let text = if Master::update(&ctx.db.pool, master_id, &name, &service_ids).await? {
        info!("Admin {} updated master {}", user.id, master_id);
        feedback::success(&format!("Данные мастера {name} обновлены."))
    } else {
        feedback::warning("Мастер не найден, возможно он уже удалён.")
    };
    Ok(to(AdminState::MastersMenu).say_with(text, menu::masters_admin_menu()))
}

async fn delete_master_select(ctx: &AppContext, text: &str) -> Result<Transition> {
    let Ok(master_id) = parse_id(text) else {
        return Ok(invalid_id(AdminState::DeleteMasterSelect, "мастера"));
    };
    let Some(master) = Master::find_by_id(&ctx.db.pool, master_id).await? else {
        return Ok(not_found(AdminState::DeleteMasterSelect, "Мастер", master_id));
    };

    Ok(to(AdminState::DeleteMasterConfirm { master_id }).say_with(
        format!("Удалить мастера {}?", master.name),
        menu::confirm_menu(),
    ))
}

async fn delete_master_confirm(
    ctx: &AppContext,
    user: &ChatUser,
    master_id: i64,
    text: &str,
) -> Result<Transition> {
    match text {
        menu::YES => {
            let text = if Master::delete(&ctx.db.pool, master_id).await? {
                info!("Admin {} deleted master {}", user.id, master_id);
                feedback::success("Мастер удалён.")
            } else {
                feedback::warning("Мастер не найден, возможно он уже удалён.")
            };
            Ok(to(AdminState::MastersMenu).say_with(text, menu::masters_admin_menu()))
        }
        menu::NO => Ok(to(AdminState::MastersMenu)
            .say_with(feedback::info("Удаление отменено."), menu::masters_admin_menu())),
        _ => Ok(to(AdminState::DeleteMasterConfirm { master_id })
            .say_with("Ответьте «Да» или «Нет».", menu::confirm_menu())),
    }
}

// Broadcast

async fn send_broadcast(ctx: &AppContext, user: &ChatUser, text: &str) -> Result<Transition> {
    let message = match validate_text(text) {
        Ok(message) => message,
        Err(_) => {
            return Ok(to(AdminState::Broadcast).say_with(
                feedback::validation_error(
                    "Сообщение не может быть пустым или длиннее 4096 символов.",
                    "Введите текст рассылки ещё раз.",
                ),
                menu::admin_input_menu(),
            ));
        }
    };

    let recipients = Client::recipient_ids(&ctx.db.pool).await?;
    if recipients.is_empty() {
        return Ok(menu_transition(feedback::warning("Нет получателей для рассылки.")));
    }

    let report = broadcast(ctx.messenger.as_ref(), &recipients, &message).await;
    info!(
        "Broadcast by admin {}: {} delivered, {} failed",
        user.id, report.delivered, report.failed
    );

    Ok(menu_transition(format!(
        "Рассылка завершена.\nУспешно: {}\nНе удалось: {}",
        report.delivered, report.failed
    )))
}

// Orders

async fn order_status_select(ctx: &AppContext, text: &str) -> Result<Transition> {
    let Ok(order_id) = parse_id(text) else {
        return Ok(invalid_id(AdminState::OrderStatusSelect, "заказа"));
    };
    let Some(order) = Order::find_by_id(&ctx.db.pool, order_id).await? else {
        return Ok(not_found(AdminState::OrderStatusSelect, "Заказ", order_id));
    };

    let current = OrderStatus::parse(&order.status)
        .map(|status| status.label())
        .unwrap_or(order.status.as_str());

    Ok(to(AdminState::OrderStatusChoose { order_id }).say_with(
        format!("Заказ №{order_id}, текущий статус: {current}\n\nВыберите новый статус:"),
        menu::status_menu(),
    ))
}

async fn order_status_choose(
    ctx: &AppContext,
    user: &ChatUser,
    order_id: i64,
    text: &str,
) -> Result<Transition> {
    let Some(status) = OrderStatus::from_label(text) else {
        return Ok(to(AdminState::OrderStatusChoose { order_id })
            .say_with("Пожалуйста, выберите статус из списка.", menu::status_menu()));
    };

    if !Order::update_status(&ctx.db.pool, order_id, status).await? {
        return Ok(menu_transition(feedback::warning("Заказ не найден.")));
    }

    info!("Admin {} set order {} to {}", user.id, order_id, status.as_str());
    Ok(menu_transition(feedback::success(&format!(
        "Статус заказа №{} изменён на «{}».",
        order_id,
        status.label()
    ))))
}

// Settings

async fn setting_value(ctx: &AppContext, field: SettingField) -> Result<String> {
    let default = match field {
        SettingField::Welcome => setting::DEFAULT_WELCOME_MESSAGE,
        SettingField::Channel => ctx.config.telegram_channel.as_str(),
        SettingField::Website => ctx.config.website_url.as_str(),
    };
    Ok(Setting::get_or(&ctx.db.pool, field.key(), default).await?)
}

async fn settings_overview(ctx: &AppContext) -> Result<Transition> {
    let welcome = setting_value(ctx, SettingField::Welcome).await?;
    let channel = setting_value(ctx, SettingField::Channel).await?;
    let website = setting_value(ctx, SettingField::Website).await?;
    let lat = Setting::get_or(
        &ctx.db.pool,
        setting::LOCATION_LAT,
        &ctx.config.location_lat.to_string(),
    )
    .await?;
    let lon = Setting::get_or(
        &ctx.db.pool,
        setting::LOCATION_LON,
        &ctx.config.location_lon.to_string(),
    )
    .await?;

    Ok(to(AdminState::SettingsMenu).say_with(
        format!(
            "⚙️ Настройки\n\n\
            Приветствие: {welcome}\n\
            Канал: {channel}\n\
            Сайт: {website}\n\
            Координаты: {lat}, {lon}"
        ),
        menu::settings_menu(),
    ))
}

async fn settings_menu_input(ctx: &AppContext, text: &str) -> Result<Transition> {
    let field = match text {
        menu::SETTING_WELCOME => SettingField::Welcome,
        menu::SETTING_CHANNEL => SettingField::Channel,
        menu::SETTING_WEBSITE => SettingField::Website,
        menu::SETTING_LOCATION => {
            return Ok(to(AdminState::EditLocationLat)
                .say_with("Введите широту (от -90 до 90):", menu::admin_input_menu()));
        }
        _ => {
            return Ok(to(AdminState::SettingsMenu)
                .say_with("Выберите настройку:", menu::settings_menu()));
        }
    };

    let current = setting_value(ctx, field).await?;
    Ok(to(AdminState::EditSetting { field }).say_with(
        format!(
            "{}. Текущее значение:\n{}\n\nВведите новое значение:",
            field.title(),
            current
        ),
        menu::admin_input_menu(),
    ))
}

fn settings_saved(text: String) -> Transition {
    to(AdminState::SettingsMenu).say_with(text, menu::settings_menu())
}

async fn edit_setting(
    ctx: &AppContext,
    user: &ChatUser,
    field: SettingField,
    text: &str,
) -> Result<Transition> {
    let Ok(value) = validate_text(text) else {
        return Ok(to(AdminState::EditSetting { field }).say_with(
            feedback::validation_error(
                "Значение не может быть пустым или длиннее 4096 символов.",
                "Введите новое значение ещё раз.",
            ),
            menu::admin_input_menu(),
        ));
    };

    Setting::update(&ctx.db.pool, field.key(), &value).await?;
    info!("Admin {} updated setting {}", user.id, field.key());
    Ok(settings_saved(feedback::success(&format!("{}: сохранено.", field.title()))))
}

fn edit_location_lat(text: &str) -> Transition {
    match parse_latitude(text) {
        Ok(lat) => to(AdminState::EditLocationLon { lat })
            .say_with("Введите долготу (от -180 до 180):", menu::admin_input_menu()),
        Err(_) => to(AdminState::EditLocationLat).say_with(
            feedback::validation_error(
                "Некорректная широта.",
                "Введите число от -90 до 90, например: 55.751244",
            ),
            menu::admin_input_menu(),
        ),
    }
}

async fn edit_location_lon(
    ctx: &AppContext,
    user: &ChatUser,
    lat: f64,
    text: &str,
) -> Result<Transition> {
    let Ok(lon) = parse_longitude(text) else {
        return Ok(to(AdminState::EditLocationLon { lat }).say_with(
            feedback::validation_error(
                "Некорректная долгота.",
                "Введите число от -180 до 180, например: 37.618423",
            ),
            menu::admin_input_menu(),
        ));
    };

    Setting::update(&ctx.db.pool, setting::LOCATION_LAT, &lat.to_string()).await?;
    Setting::update(&ctx.db.pool, setting::LOCATION_LON, &lon.to_string()).await?;
    info!("Admin {} moved the studio location to {}, {}", user.id, lat, lon);
    Ok(settings_saved(feedback::success(&format!(
        "Адрес студии обновлён: {lat}, {lon}"
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(first_name: Option<&str>, phone: Option<&str>) -> ClientSummary {
        ClientSummary {
            id: 7,
            telegram_id: 42,
            first_name: first_name.map(str::to_string),
            phone: phone.map(str::to_string),
            created_at: "2024-06-01T10:00:00+00:00".to_string(),
            order_count: 2,
        }
    }

    #[test]
    fn test_client_line() {
        let line = client_line(&summary(Some("Ирина"), Some("+79991234567")));
        assert_eq!(line, "7. Ирина | +79991234567 | заказов: 2 | с 2024-06-01");

        let line = client_line(&summary(None, None));
        assert!(line.contains("— | нет телефона"));
    }

    #[test]
    fn test_order_block_with_deleted_service() {
        let order = OrderDetails {
            id: 3,
            client_name: Some("Ирина".to_string()),
            phone: Some("+79991234567".to_string()),
            category: None,
            service_name: None,
            price: None,
            master_name: "Анна".to_string(),
            status: "confirmed".to_string(),
            created_at: "2024-06-02T09:00:00+00:00".to_string(),
        };

        let block = order_block(&order);
        assert!(block.starts_with("№3 от 2024-06-02"));
        assert!(block.contains("услуга удалена"));
        assert!(block.contains("Статус: Подтверждена"));
    }

    #[test]
    fn test_report_splits_long_text() {
        let body = "строка\n".repeat(1000);
        let transition = report("Заголовок".to_string(), body);
        assert!(transition.replies.len() > 1);
        assert_eq!(transition.keyboard(), Some(&menu::admin_menu()));
        assert_eq!(transition.next, State::Admin(AdminState::Menu));
    }
}
