/// Message endpoints and reply delivery
pub mod message;

use teloxide::{
    dispatching::{dialogue, dialogue::InMemStorage, UpdateHandler},
    prelude::*,
};

use crate::bot::commands::Command;
use crate::bot::context::AppContext;
use crate::bot::dialogue::{BotDialogue, State};

/// Builds the dispatcher schema around a shared [`AppContext`].
pub struct BotHandler {
    /// Context cloned into every endpoint
    pub ctx: AppContext,
}

impl BotHandler {
    /// Wraps the context used by all endpoints.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Handler tree: dialogue storage first, then commands, then any other message.
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use teloxide::dispatching::UpdateFilterExt;

        let ctx_command = self.ctx.clone();
        let ctx_text = self.ctx.clone();

        dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(
                        move |bot: Bot, dialogue: BotDialogue, msg: Message, cmd: Command| {
                            let ctx = ctx_command.clone();
                            async move { message::command_handler(bot, dialogue, msg, cmd, ctx).await }
                        },
                    ),
            )
            .branch(Update::filter_message().endpoint(
                move |bot: Bot, dialogue: BotDialogue, msg: Message| {
                    let ctx = ctx_text.clone();
                    async move { message::text_handler(bot, dialogue, msg, ctx).await }
                },
            ))
    }
}
