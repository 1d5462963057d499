use async_trait::async_trait;
use salon_booking_bot::services::notifier::{
    broadcast, deliver_to_all, notify_admins, DeliveryReport, Messenger, NewOrderNotice,
};
use std::sync::Mutex;

/// Accepts everything except the chats listed in `failing`.
struct FakeMessenger {
    sent: Mutex<Vec<(i64, String)>>,
    failing: Vec<i64>,
}

impl FakeMessenger {
    fn new(failing: Vec<i64>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing,
        }
    }

    fn recipients(&self) -> Vec<i64> {
        self.sent.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        if self.failing.contains(&chat_id) {
            anyhow::bail!("Forbidden: bot was blocked by the user");
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn test_delivery_continues_after_failures() {
    let messenger = FakeMessenger::new(vec![2, 4]);

    let report = deliver_to_all(&messenger, &[1, 2, 3, 4, 5], "hello", "test").await;

    assert_eq!(report, DeliveryReport { delivered: 3, failed: 2 });
    assert_eq!(report.attempted(), 5);
    assert_eq!(messenger.recipients(), vec![1, 3, 5]);
}

#[tokio::test]
async fn test_delivery_keeps_recipient_order() {
    let messenger = FakeMessenger::new(vec![]);

    let report = broadcast(&messenger, &[30, 10, 20], "Акция").await;

    assert_eq!(report.delivered, 3);
    assert_eq!(messenger.recipients(), vec![30, 10, 20]);
}

#[tokio::test]
async fn test_no_recipients_is_an_empty_report() {
    let messenger = FakeMessenger::new(vec![]);

    let report = notify_admins(&messenger, &[], "Новая заявка").await;

    assert_eq!(report, DeliveryReport::default());
    assert_eq!(report.attempted(), 0);
}

#[tokio::test]
async fn test_all_admins_failing_is_reported_not_raised() {
    let messenger = FakeMessenger::new(vec![1, 2]);

    let report = notify_admins(&messenger, &[1, 2], "Новая заявка").await;

    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 2);
}

#[test]
fn test_new_order_notice_lists_order_details() {
    let text = NewOrderNotice {
        order_id: 12,
        client_name: "Ирина",
        phone: "+79991234567",
        category: "Маникюр",
        service_name: "Гель-лак",
        price: 2000,
        duration: 90,
        master_name: "Любой мастер",
    }
    .render();

    for expected in [
        "Новая заявка №12",
        "Имя: Ирина",
        "Телефон: +79991234567",
        "Категория: Маникюр",
        "Услуга: Гель-лак",
        "Стоимость: 2000 руб.",
        "Длительность: 90 мин.",
        "Мастер: Любой мастер",
    ] {
        assert!(text.contains(expected), "missing {expected:?} in {text}");
    }
}
