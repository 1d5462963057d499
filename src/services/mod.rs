/// HTTP health check endpoints
pub mod health;
/// Outbound messages to admins and clients
pub mod notifier;
/// PDF price list generation
pub mod price_list;
