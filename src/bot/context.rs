use std::sync::Arc;

use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::notifier::Messenger;

/// Everything a conversation step needs besides its input.
#[derive(Clone)]
pub struct AppContext {
    /// Database handle
    pub db: DatabaseManager,
    /// Startup configuration
    pub config: Config,
    /// Outbound channel for notifications and broadcasts
    pub messenger: Arc<dyn Messenger>,
}

impl AppContext {
    /// Bundles the shared dependencies.
    pub fn new(db: DatabaseManager, config: Config, messenger: Arc<dyn Messenger>) -> Self {
        Self { db, config, messenger }
    }

    /// Whether the user is on the configured admin allow-list.
    pub fn is_admin(&self, user: &ChatUser) -> bool {
        self.config.is_admin(user.id)
    }
}

/// The sender of an update, detached from the Telegram types.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatUser {
    /// Telegram user id, also the private chat id
    pub id: i64,
    /// First name from the Telegram profile
    pub first_name: String,
    /// Username without the leading `@`
    pub username: Option<String>,
}

impl ChatUser {
    /// A user without a username.
    pub fn new(id: i64, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            username: None,
        }
    }

    /// `@username` when known, otherwise the first name.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) => format!("@{username}"),
            None => self.first_name.clone(),
        }
    }
}
