//! Routes commands and free text to the booking or admin controller.

use anyhow::Result;

use crate::bot::admin;
use crate::bot::booking;
use crate::bot::commands::Command;
use crate::bot::context::{AppContext, ChatUser};
use crate::bot::dialogue::State;
use crate::bot::menu;
use crate::bot::reply::Transition;
use crate::utils::feedback;
use crate::utils::logging::log_access_denied;

/// Shown when a step fails with an unexpected error.
pub const GENERIC_ERROR: &str = "Произошла ошибка. Попробуйте еще раз.";

/// Handles a slash command. Commands work from any state; `/cancel` and
/// `/start` drop whatever the chat was doing.
pub async fn on_command(
    ctx: &AppContext,
    state: State,
    user: &ChatUser,
    command: Command,
) -> Result<Transition> {
    match command {
        Command::Start => booking::start(ctx, user).await,
        Command::Help => Ok(booking::help(ctx, state)),
        Command::Admin => Ok(admin::enter(ctx, user)),
        Command::Cancel => Ok(booking::cancel()),
    }
}

/// Handles a non-command message in the given state.
///
/// "Отмена" resets to the main menu from anywhere. Admin states re-check the
/// allow-list before every step, everything else goes to the booking flow.
pub async fn on_text(
    ctx: &AppContext,
    state: State,
    user: &ChatUser,
    text: &str,
) -> Result<Transition> {
    let text = text.trim();

    if text == menu::CANCEL {
        return Ok(booking::cancel());
    }

    match state {
        State::Admin(admin_state) => {
            // The allow-list may have changed since the panel was opened.
            if !ctx.is_admin(user) {
                log_access_denied(&user.display_name(), user.id, "admin input");
                return Ok(Transition::to(State::Start).say_with(
                    feedback::error("У вас нет доступа к панели администратора."),
                    menu::main_menu(),
                ));
            }
            admin::handle(ctx, admin_state, user, text).await
        }
        state => booking::handle(ctx, state, user, text).await,
    }
}

/// Reply sent when a step fails: back to the main menu with scratch data dropped.
pub fn failure() -> Transition {
    Transition::to(State::Start).say_with(feedback::error(GENERIC_ERROR), menu::main_menu())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_resets_to_start() {
        let transition = failure();
        assert_eq!(transition.next, State::Start);
        assert!(transition.text().contains(GENERIC_ERROR));
        assert_eq!(transition.keyboard(), Some(&menu::main_menu()));
    }
}
