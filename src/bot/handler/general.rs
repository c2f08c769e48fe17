use teloxide::types::ChatId;

use crate::bot::{dispatcher::BotContext, processor::register_user};

use super::utils::{display_welcome, send_bot_message, HandlerResult};

/* Invalid state.
 * Invoked for plain text when the user has no dialogue pending.
 * Simply does not respond to anything. Reduces spam.
 */
pub async fn invalid_state(_ctx: &BotContext, user_id: ChatId, text: &str) -> HandlerResult {
    log::debug!(
        "Ignoring text from user {} with no pending dialogue: {:?}",
        user_id.0,
        text
    );
    Ok(())
}

/* Start command.
 * Registers the user on first contact and displays the welcome message.
 */
pub async fn action_start(ctx: &BotContext, user_id: ChatId) -> HandlerResult {
    register_user(&ctx.store, user_id)?;
    send_bot_message(ctx, user_id, display_welcome()).await?;
    Ok(())
}
