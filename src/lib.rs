//! # Salon Booking Bot
//!
//! A Telegram bot for a manicure studio: clients book services through reply
//! menus, administrators manage the catalogue and reach clients.
//!
//! ## Features
//! - Booking flow: category, service, master, phone
//! - Admin notifications for every new order
//! - Admin panel for services, masters, orders, settings and broadcasts
//! - PDF price list generated from the catalogue
//! - Persistent storage with SQLite

/// Conversation controllers, dialogue state and Telegram handlers
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Health endpoints, outbound notifications and the price list
pub mod services;
/// Validation, text splitting, feedback formatting and logging helpers
pub mod utils;
