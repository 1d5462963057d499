/// Emoji prefixed user feedback
pub mod feedback;
/// Tracing setup and structured event helpers
pub mod logging;
/// Message length helpers
pub mod text;
/// Parsing and validation of admin and client input
pub mod validation;
