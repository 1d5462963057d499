//! Button labels and reply keyboards. Incoming text is matched against these
//! labels verbatim.

use crate::bot::reply::Keyboard;
use crate::database::models::{Category, OrderStatus, Service};

/// Returns one step back in the booking flow
pub const BACK: &str = "Назад";
/// Resets to the main menu from any state
pub const CANCEL: &str = "Отмена";
/// Confirms a deletion
pub const YES: &str = "Да";
/// Declines a deletion
pub const NO: &str = "Нет";

/// Sends the PDF price list
pub const PRICE_LIST: &str = "Скачать прайс";
/// Sends the website link
pub const WEBSITE: &str = "Перейти на сайт";
/// Sends the channel link
pub const CHANNEL: &str = "Телеграм-канал";
/// Sends the studio address and map pin
pub const LOCATION: &str = "Адрес студии";
/// Offered when no master is linked to a service
pub const ANY_MASTER: &str = "Любой мастер";

/// Admin menu button
pub const ADMIN_SERVICES: &str = "Управление услугами";
/// Admin menu button
pub const ADMIN_MASTERS: &str = "Управление мастерами";
/// Admin menu button
pub const ADMIN_BROADCAST: &str = "Рассылка";
/// Admin menu button
pub const ADMIN_CLIENTS: &str = "Список клиентов";
/// Admin menu button
pub const ADMIN_ORDERS: &str = "Список заказов";
/// Admin menu button
pub const ADMIN_ORDER_STATUS: &str = "Статус заказа";
/// Admin menu button
pub const ADMIN_SETTINGS: &str = "Настройки";
/// Leaves the admin panel for the main menu
pub const ADMIN_EXIT: &str = "Выйти из админки";
/// Returns to the admin menu from any admin step
pub const ADMIN_BACK: &str = "Назад в админ-панель";

/// Service management button
pub const ADD_SERVICE: &str = "Добавить услугу";
/// Service management button
pub const EDIT_SERVICE: &str = "Редактировать услугу";
/// Service management button
pub const DELETE_SERVICE: &str = "Удалить услугу";

/// Master management button
pub const ADD_MASTER: &str = "Добавить мастера";
/// Master management button
pub const EDIT_MASTER: &str = "Редактировать мастера";
/// Master management button
pub const DELETE_MASTER: &str = "Удалить мастера";

/// Settings menu button
pub const SETTING_WELCOME: &str = "Изменить приветствие";
/// Settings menu button
pub const SETTING_CHANNEL: &str = "Изменить ссылку на канал";
/// Settings menu button
pub const SETTING_WEBSITE: &str = "Изменить ссылку на сайт";
/// Settings menu button
pub const SETTING_LOCATION: &str = "Изменить адрес";

fn menu(rows: Vec<Vec<&str>>) -> Keyboard {
    Keyboard::Menu(
        rows.into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect(),
    )
}

fn category_row() -> Vec<&'static str> {
    Category::ALL.iter().map(|category| category.label()).collect()
}

/// Categories plus the info buttons.
pub fn main_menu() -> Keyboard {
    menu(vec![
        category_row(),
        vec![PRICE_LIST, WEBSITE],
        vec![CHANNEL, LOCATION],
    ])
}

/// One button per service, plus "back".
pub fn services_menu(services: &[Service]) -> Keyboard {
    let mut rows: Vec<Vec<String>> = services
        .iter()
        .map(|service| vec![service.menu_label()])
        .collect();
    rows.push(vec![BACK.to_string()]);
    Keyboard::Menu(rows)
}

/// One button per master name, plus "back".
pub fn masters_menu(master_names: &[String]) -> Keyboard {
    let mut rows: Vec<Vec<String>> = master_names
        .iter()
        .map(|name| vec![name.clone()])
        .collect();
    rows.push(vec![BACK.to_string()]);
    Keyboard::Menu(rows)
}

/// Shown while waiting for the phone number.
pub fn phone_menu() -> Keyboard {
    menu(vec![vec![BACK, CANCEL]])
}

/// Top-level admin panel.
pub fn admin_menu() -> Keyboard {
    menu(vec![
        vec![ADMIN_SERVICES, ADMIN_MASTERS],
        vec![ADMIN_CLIENTS, ADMIN_ORDERS],
        vec![ADMIN_ORDER_STATUS, ADMIN_BROADCAST],
        vec![ADMIN_SETTINGS, PRICE_LIST],
        vec![ADMIN_EXIT],
    ])
}

/// Add, edit or delete a service.
pub fn services_admin_menu() -> Keyboard {
    menu(vec![
        vec![ADD_SERVICE, EDIT_SERVICE, DELETE_SERVICE],
        vec![ADMIN_BACK],
    ])
}

/// Add, edit or delete a master.
pub fn masters_admin_menu() -> Keyboard {
    menu(vec![
        vec![ADD_MASTER, EDIT_MASTER, DELETE_MASTER],
        vec![ADMIN_BACK],
    ])
}

/// Editable settings.
pub fn settings_menu() -> Keyboard {
    menu(vec![
        vec![SETTING_WELCOME, SETTING_CHANNEL],
        vec![SETTING_WEBSITE, SETTING_LOCATION],
        vec![ADMIN_BACK],
    ])
}

/// Category choice for a new service.
pub fn admin_categories_menu() -> Keyboard {
    menu(vec![category_row(), vec![ADMIN_BACK]])
}

/// Yes or no.
pub fn confirm_menu() -> Keyboard {
    menu(vec![vec![YES, NO]])
}

/// Every order status label.
pub fn status_menu() -> Keyboard {
    let statuses: Vec<&str> = OrderStatus::ALL.iter().map(|status| status.label()).collect();
    menu(vec![statuses, vec![ADMIN_BACK]])
}

/// Free-text admin prompts only offer a way back.
pub fn admin_input_menu() -> Keyboard {
    menu(vec![vec![ADMIN_BACK]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_lists_every_category() {
        let keyboard = main_menu();
        let labels = keyboard.labels();
        for category in Category::ALL {
            assert!(labels.contains(&category.label()));
        }
        assert!(labels.contains(&PRICE_LIST));
    }

    #[test]
    fn test_masters_menu_appends_back() {
        let keyboard = masters_menu(&["Анна".to_string()]);
        assert_eq!(keyboard.labels(), vec!["Анна", BACK]);
    }

    #[test]
    fn test_admin_labels_are_unique() {
        let keyboard = admin_menu();
        let labels = keyboard.labels();
        let mut deduped = labels.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(labels.len(), deduped.len());
    }
}
