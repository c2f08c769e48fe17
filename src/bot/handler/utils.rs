use teloxide::{types::ChatId, RequestError};

use crate::bot::{dispatcher::BotContext, processor::WithdrawRequest};

pub use crate::bot::dispatcher::HandlerResult;

use super::constants::APP_LINK;

/* Common utilities for handlers. */

// Sends a Markdown message through the bot's messenger.
pub async fn send_bot_message(
    ctx: &BotContext,
    chat_id: ChatId,
    text: impl Into<String>,
) -> Result<(), RequestError> {
    ctx.messenger.send_markdown(chat_id, text.into()).await
}

pub fn display_welcome() -> String {
    format!("👋 *Swagat Hai!*\n\n📲 *App ko install karein aur Paws kamaayein:* {APP_LINK}")
}

// Confirmation shown to the requesting user.
pub fn display_withdraw_confirmation(request: &WithdrawRequest) -> String {
    format!(
        "✅ *Withdraw Request Sent:*\nAmount: {} Paws\nWallet: `{}`",
        request.amount, request.wallet_address
    )
}

// Notification relayed to the admin chat.
pub fn display_admin_notification(request: &WithdrawRequest) -> String {
    format!(
        "📩 *New Withdraw Request!*\nUser: `{}`\nAmount: {} Paws\nWallet: `{}`",
        request.user_id.0, request.amount, request.wallet_address
    )
}

pub fn display_error(err: &RequestError) -> String {
    format!("🚨 Error: {err}")
}
