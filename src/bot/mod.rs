/// Admin panel controller
pub mod admin;
/// Client booking controller
pub mod booking;
/// Slash commands
pub mod commands;
/// Shared context passed to every conversation step
pub mod context;
/// Per-chat conversation state
pub mod dialogue;
/// Routing of commands and text to the controllers
pub mod flow;
/// Teloxide handler tree and reply delivery
pub mod handlers;
/// Reply keyboards and button labels
pub mod menu;
/// Transport independent replies
pub mod reply;
