/// Telegram users who talked to the bot
pub mod client;
/// Salon staff
pub mod master;
/// Bookings and their status
pub mod order;
/// Catalogue of services by category
pub mod service;
/// Key-value settings edited from the admin panel
pub mod setting;

pub use client::*;
pub use master::*;
pub use order::*;
pub use service::*;
pub use setting::Setting;
