use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::Dialogue;

use crate::database::models::{setting, Category};

/// Dialogue handle injected into teloxide endpoints.
pub type BotDialogue = Dialogue<State, InMemStorage<State>>;
/// Return type of teloxide endpoints.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Per-chat conversation state. Scratch data collected by a flow lives in the
/// variant itself, so resetting the state also clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum State {
    /// Main menu, waiting for a category or one of the info buttons.
    #[default]
    Start,
    /// Service keyboard for a category is shown.
    ChoosingService {
        /// Category picked from the main menu
        category: Category,
    },
    /// Master keyboard for the chosen service is shown.
    ChoosingMaster {
        /// Category to go back to
        category: Category,
        /// Chosen service
        service_id: i64,
    },
    /// Waiting for a phone number or a shared contact.
    EnteringPhone {
        /// Category to go back to
        category: Category,
        /// Chosen service
        service_id: i64,
        /// Chosen master name, or the "any master" label
        master: String,
    },
    /// Inside the admin panel.
    Admin(AdminState),
}

/// Admin panel steps. Fields hold what earlier steps of the same flow collected.
#[derive(Clone, Debug, PartialEq)]
pub enum AdminState {
    /// Top-level admin keyboard
    Menu,
    /// Service management keyboard
    ServicesMenu,
    /// New service: pick a category
    AddServiceCategory,
    /// New service: enter the name
    AddServiceName {
        /// Chosen category
        category: Category,
    },
    /// New service: enter the price
    AddServicePrice {
        /// Chosen category
        category: Category,
        /// Validated name
        name: String,
    },
    /// New service: enter the duration
    AddServiceDuration {
        /// Chosen category
        category: Category,
        /// Validated name
        name: String,
        /// Price in roubles
        price: i64,
    },
    /// Edit service: enter its id
    EditServiceSelect,
    /// Edit service: enter the comma separated details
    EditServiceDetails {
        /// Service being edited
        service_id: i64,
    },
    /// Delete service: enter its id
    DeleteServiceSelect,
    /// Delete service: yes or no
    DeleteServiceConfirm {
        /// Service to delete
        service_id: i64,
    },
    /// Master management keyboard
    MastersMenu,
    /// New master: enter the name
    AddMasterName,
    /// New master: enter the phone
    AddMasterPhone {
        /// Validated name
        name: String,
    },
    /// New master: enter the service ids
    AddMasterServices {
        /// Validated name
        name: String,
        /// Normalized phone
        phone: String,
    },
    /// Edit master: enter its id
    EditMasterSelect,
    /// Edit master: enter name and service ids
    EditMasterDetails {
        /// Master being edited
        master_id: i64,
    },
    /// Delete master: enter its id
    DeleteMasterSelect,
    /// Delete master: yes or no
    DeleteMasterConfirm {
        /// Master to delete
        master_id: i64,
    },
    /// Waiting for the broadcast text
    Broadcast,
    /// Order status: enter the order id
    OrderStatusSelect,
    /// Order status: pick the new status
    OrderStatusChoose {
        /// Order being updated
        order_id: i64,
    },
    /// Settings keyboard
    SettingsMenu,
    /// Waiting for the new value of a text setting
    EditSetting {
        /// Setting being edited
        field: SettingField,
    },
    /// Studio location: enter the latitude
    EditLocationLat,
    /// Studio location: enter the longitude
    EditLocationLon {
        /// Validated latitude
        lat: f64,
    },
}

/// Free-text settings editable from the admin panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingField {
    /// Greeting shown on /start
    Welcome,
    /// Telegram channel link
    Channel,
    /// Website link
    Website,
}

impl SettingField {
    /// Key in the settings table.
    pub fn key(&self) -> &'static str {
        match self {
            SettingField::Welcome => setting::WELCOME_MESSAGE,
            SettingField::Channel => setting::TELEGRAM_CHANNEL,
            SettingField::Website => setting::WEBSITE_URL,
        }
    }

    /// Human readable name for prompts.
    pub fn title(&self) -> &'static str {
        match self {
            SettingField::Welcome => "Приветствие",
            SettingField::Channel => "Ссылка на канал",
            SettingField::Website => "Ссылка на сайт",
        }
    }
}

impl State {
    /// Short name used in flow logs.
    pub fn name(&self) -> String {
        match self {
            State::Start => "start".to_string(),
            State::ChoosingService { .. } => "choosing_service".to_string(),
            State::ChoosingMaster { .. } => "choosing_master".to_string(),
            State::EnteringPhone { .. } => "entering_phone".to_string(),
            State::Admin(admin) => format!("admin:{}", admin.name()),
        }
    }
}

impl AdminState {
    /// Step name without its scratch data.
    pub fn name(&self) -> &'static str {
        match self {
            AdminState::Menu => "menu",
            AdminState::ServicesMenu => "services_menu",
            AdminState::AddServiceCategory => "add_service_category",
            AdminState::AddServiceName { .. } => "add_service_name",
            AdminState::AddServicePrice { .. } => "add_service_price",
            AdminState::AddServiceDuration { .. } => "add_service_duration",
            AdminState::EditServiceSelect => "edit_service_select",
            AdminState::EditServiceDetails { .. } => "edit_service_details",
            AdminState::DeleteServiceSelect => "delete_service_select",
            AdminState::DeleteServiceConfirm { .. } => "delete_service_confirm",
            AdminState::MastersMenu => "masters_menu",
            AdminState::AddMasterName => "add_master_name",
            AdminState::AddMasterPhone { .. } => "add_master_phone",
            AdminState::AddMasterServices { .. } => "add_master_services",
            AdminState::EditMasterSelect => "edit_master_select",
            AdminState::EditMasterDetails { .. } => "edit_master_details",
            AdminState::DeleteMasterSelect => "delete_master_select",
            AdminState::DeleteMasterConfirm { .. } => "delete_master_confirm",
            AdminState::Broadcast => "broadcast",
            AdminState::OrderStatusSelect => "order_status_select",
            AdminState::OrderStatusChoose { .. } => "order_status_choose",
            AdminState::SettingsMenu => "settings_menu",
            AdminState::EditSetting { .. } => "edit_setting",
            AdminState::EditLocationLat => "edit_location_lat",
            AdminState::EditLocationLon { .. } => "edit_location_lon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_start() {
        assert_eq!(State::default(), State::Start);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(State::Start.name(), "start");
        assert_eq!(
            State::ChoosingService { category: Category::Manicure }.name(),
            "choosing_service"
        );
        assert_eq!(State::Admin(AdminState::Menu).name(), "admin:menu");
        assert_eq!(
            State::Admin(AdminState::EditServiceDetails { service_id: 3 }).name(),
            "admin:edit_service_details"
        );
    }

    #[test]
    fn test_admin_names_ignore_scratch_data() {
        let a = AdminState::AddServicePrice {
            category: Category::Manicure,
            name: "Тест {x}".to_string(),
        };
        let b = AdminState::AddServicePrice {
            category: Category::Pedicure,
            name: "Другое".to_string(),
        };
        assert_eq!(a.name(), "add_service_price");
        assert_eq!(a.name(), b.name());
        assert_eq!(
            AdminState::EditLocationLon { lat: 55.75 }.name(),
            "edit_location_lon"
        );
        assert_eq!(
            AdminState::EditSetting { field: SettingField::Welcome }.name(),
            "edit_setting"
        );
    }
}
