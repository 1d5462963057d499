use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64) {
    info!(
        "CMD_START: {} by {}({}) in chat {}",
        command, user, user_id, chat_id
    );
}

/// Logs a dialogue state change
pub fn log_transition(user_id: i64, from: &str, to: &str) {
    if from != to {
        debug!("FLOW: user {} {} -> {}", user_id, from, to);
    }
}

/// Logs a rejected admin entry
pub fn log_access_denied(user: &str, user_id: i64, action: &str) {
    warn!("ACCESS_DENIED: {} by {}({})", action, user, user_id);
}

/// Logs a failed outbound message
pub fn log_delivery_failure(kind: &str, recipient: i64, error: &str) {
    error!("DELIVERY_FAILED: {} to {} - {}", kind, recipient, error);
}

/// Logs a handler failure that was turned into the generic error reply
pub fn log_handler_error(user: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(
        "HANDLER_ERROR: by {}({}) in chat {} - {}",
        user, user_id, chat_id, error
    );
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
