use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;

use crate::utils::logging::log_delivery_failure;

/// Outbound text delivery to a chat identity.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a plain text message to the chat.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}

#[async_trait]
impl Messenger for Bot {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.send_message(ChatId(chat_id), text.to_string()).await?;
        Ok(())
    }
}

/// Counts of a fan-out run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Messages accepted by Telegram
    pub delivered: usize,
    /// Messages that errored
    pub failed: usize,
}

impl DeliveryReport {
    /// Total recipients tried.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Sends `text` to each recipient in order. Failures are logged and counted,
/// never retried, and do not stop the remaining deliveries.
pub async fn deliver_to_all(
    messenger: &dyn Messenger,
    recipients: &[i64],
    text: &str,
    kind: &str,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for &recipient in recipients {
        match messenger.send_text(recipient, text).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                log_delivery_failure(kind, recipient, &e.to_string());
                report.failed += 1;
            }
        }
    }

    report
}

/// Sends a notice to every configured admin.
pub async fn notify_admins(messenger: &dyn Messenger, admin_ids: &[i64], text: &str) -> DeliveryReport {
    deliver_to_all(messenger, admin_ids, text, "admin_notification").await
}

/// Sends the admin broadcast text to every client.
pub async fn broadcast(messenger: &dyn Messenger, recipients: &[i64], text: &str) -> DeliveryReport {
    deliver_to_all(messenger, recipients, text, "broadcast").await
}

/// Details of a freshly placed order, as shown to administrators.
pub struct NewOrderNotice<'a> {
    /// Order number
    pub order_id: i64,
    /// Client first name
    pub client_name: &'a str,
    /// Normalized phone
    pub phone: &'a str,
    /// Category label
    pub category: &'a str,
    /// Service name
    pub service_name: &'a str,
    /// Price in roubles
    pub price: i64,
    /// Duration in minutes
    pub duration: i64,
    /// Chosen master or "any master"
    pub master_name: &'a str,
}

impl NewOrderNotice<'_> {
    /// Message text sent to the admins.
    pub fn render(&self) -> String {
        format!(
            "🎉 Новая заявка №{}\n\
            Имя: {}\n\
            Телефон: {}\n\
            Категория: {}\n\
            Услуга: {}\n\
            Стоимость: {} руб.\n\
            Длительность: {} мин.\n\
            Мастер: {}\n\n\
            📞 Свяжитесь с клиентом для согласования даты и времени!",
            self.order_id,
            self.client_name,
            self.phone,
            self.category,
            self.service_name,
            self.price,
            self.duration,
            self.master_name,
        )
    }
}
