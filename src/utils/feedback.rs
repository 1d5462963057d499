/// Feedback types for different command outcomes
#[derive(Debug, Clone)]
pub enum FeedbackType {
    /// Action completed
    Success,
    /// Nothing done, user can retry
    Warning,
    /// Invalid input or failure
    Error,
    /// Neutral notice
    Info,
}

impl FeedbackType {
    /// Prefix emoji.
    pub fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }
}

/// Prefixes a user-facing message with the emoji of its feedback type.
pub fn format_feedback(feedback_type: FeedbackType, message: &str) -> String {
    format!("{} {}", feedback_type.emoji(), message)
}

/// `✅ message`
pub fn success(message: &str) -> String {
    format_feedback(FeedbackType::Success, message)
}

/// `⚠️ message`
pub fn warning(message: &str) -> String {
    format_feedback(FeedbackType::Warning, message)
}

/// `❌ message`
pub fn error(message: &str) -> String {
    format_feedback(FeedbackType::Error, message)
}

/// `ℹ️ message`
pub fn info(message: &str) -> String {
    format_feedback(FeedbackType::Info, message)
}

/// Validation error with a hint on what to enter instead.
pub fn validation_error(error: &str, suggestion: &str) -> String {
    format_feedback(FeedbackType::Error, &format!("{error}\n\n💡 {suggestion}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
    }

    #[test]
    fn test_validation_error_layout() {
        let text = validation_error("Неверная цена", "Введите число");
        assert!(text.starts_with("❌ Неверная цена"));
        assert!(text.ends_with("💡 Введите число"));
    }
}
