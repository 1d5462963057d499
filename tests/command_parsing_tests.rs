use salon_booking_bot::bot::commands::Command;
use teloxide::utils::command::BotCommands;

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_start_command_parsing() {
        let result = Command::parse("/start", "salonbot");
        assert_eq!(result.unwrap(), Command::Start);
    }

    #[test]
    fn test_help_command_parsing() {
        let result = Command::parse("/help", "salonbot");
        assert_eq!(result.unwrap(), Command::Help);
    }

    #[test]
    fn test_admin_command_parsing() {
        let result = Command::parse("/admin", "salonbot");
        assert_eq!(result.unwrap(), Command::Admin);
    }

    #[test]
    fn test_cancel_command_parsing() {
        let result = Command::parse("/cancel", "salonbot");
        assert_eq!(result.unwrap(), Command::Cancel);
    }

    #[test]
    fn test_command_with_bot_mention() {
        let result = Command::parse("/start@salonbot", "salonbot");
        assert_eq!(result.unwrap(), Command::Start);
    }

    #[test]
    fn test_command_for_other_bot_is_rejected() {
        assert!(Command::parse("/start@otherbot", "salonbot").is_err());
    }

    #[test]
    fn test_unknown_commands_are_rejected() {
        for input in ["/schedule", "/book", "/Admin2", "/"] {
            assert!(Command::parse(input, "salonbot").is_err(), "{input} parsed");
        }
    }

    #[test]
    fn test_menu_labels_are_not_commands() {
        for input in ["Маникюр", "Отмена", "Назад", "start"] {
            assert!(Command::parse(input, "salonbot").is_err(), "{input} parsed");
        }
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Start.name(), "/start");
        assert_eq!(Command::Help.name(), "/help");
        assert_eq!(Command::Admin.name(), "/admin");
        assert_eq!(Command::Cancel.name(), "/cancel");
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let descriptions = Command::descriptions().to_string();
        for command in ["/start", "/help", "/admin", "/cancel"] {
            assert!(descriptions.contains(command), "{command} missing");
        }
    }
}
