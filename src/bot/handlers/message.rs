use teloxide::prelude::*;
use teloxide::types::{InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove};

use crate::bot::commands::Command;
use crate::bot::context::{AppContext, ChatUser};
use crate::bot::dialogue::{BotDialogue, HandlerResult, State};
use crate::bot::flow;
use crate::bot::reply::{Keyboard, Outgoing, Transition};
use crate::utils::logging::{log_command_start, log_handler_error, log_transition};

/// Endpoint for recognised slash commands.
pub async fn command_handler(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    cmd: Command,
    ctx: AppContext,
) -> HandlerResult {
    let user = chat_user(&msg);
    let state = dialogue.get().await?.unwrap_or_default();

    log_command_start(cmd.name(), &user.display_name(), user.id, msg.chat.id.0);

    let outcome = flow::on_command(&ctx, state.clone(), &user, cmd).await;
    finish(&bot, &dialogue, &msg, &user, &state, outcome).await
}

/// Endpoint for every other message. Non-text messages get a hint and keep the state.
pub async fn text_handler(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    ctx: AppContext,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(
            msg.chat.id,
            "Пожалуйста, используйте кнопки меню или отправьте текстовое сообщение.",
        )
        .await?;
        return Ok(());
    };

    let user = chat_user(&msg);
    let state = dialogue.get().await?.unwrap_or_default();

    let outcome = flow::on_text(&ctx, state.clone(), &user, text).await;
    finish(&bot, &dialogue, &msg, &user, &state, outcome).await
}

/// Stores the next state and sends the replies. A failed step is logged and
/// turned into the generic error reply with the dialogue reset.
async fn finish(
    bot: &Bot,
    dialogue: &BotDialogue,
    msg: &Message,
    user: &ChatUser,
    from: &State,
    outcome: anyhow::Result<Transition>,
) -> HandlerResult {
    let transition = outcome.unwrap_or_else(|e| {
        log_handler_error(&user.display_name(), user.id, msg.chat.id.0, &format!("{e:#}"));
        flow::failure()
    });

    log_transition(user.id, &from.name(), &transition.next.name());
    dialogue.update(transition.next.clone()).await?;
    deliver(bot, msg.chat.id, &transition.replies).await?;

    Ok(())
}

fn chat_user(msg: &Message) -> ChatUser {
    match msg.from() {
        Some(user) => ChatUser {
            id: user.id.0 as i64,
            first_name: user.first_name.clone(),
            username: user.username.clone(),
        },
        None => ChatUser::new(msg.chat.id.0, msg.chat.first_name().unwrap_or_default()),
    }
}

fn reply_keyboard(rows: &[Vec<String>]) -> KeyboardMarkup {
    let buttons: Vec<Vec<KeyboardButton>> = rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect())
        .collect();

    KeyboardMarkup::new(buttons).resize_keyboard(true)
}

/// Sends the replies in order, translating keyboards to Telegram markup.
pub async fn deliver(bot: &Bot, chat_id: ChatId, replies: &[Outgoing]) -> ResponseResult<()> {
    for reply in replies {
        match reply {
            Outgoing::Text { text, keyboard } => {
                let request = bot.send_message(chat_id, text.clone());
                match keyboard {
                    Some(Keyboard::Menu(rows)) => request.reply_markup(reply_keyboard(rows)).await?,
                    Some(Keyboard::Remove) => request.reply_markup(KeyboardRemove::new()).await?,
                    None => request.await?,
                };
            }
            Outgoing::Location { latitude, longitude } => {
                bot.send_location(chat_id, *latitude, *longitude).await?;
            }
            Outgoing::Document { file_name, caption, bytes } => {
                let file = InputFile::memory(bytes.clone()).file_name(file_name.clone());
                bot.send_document(chat_id, file).caption(caption.clone()).await?;
            }
        }
    }
    Ok(())
}
