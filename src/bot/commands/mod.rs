use teloxide::utils::command::BotCommands;

/// Slash commands understood in any state.
#[allow(missing_docs)] // variants are described through #[command(description)]
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Команды бота студии:")]
pub enum Command {
    #[command(description = "Главное меню и запись на услугу")]
    Start,
    #[command(description = "Помощь и контакты")]
    Help,
    #[command(description = "Панель администратора")]
    Admin,
    #[command(description = "Отменить текущее действие")]
    Cancel,
}

impl Command {
    /// Name used in command logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::Help => "/help",
            Command::Admin => "/admin",
            Command::Cancel => "/cancel",
        }
    }
}
