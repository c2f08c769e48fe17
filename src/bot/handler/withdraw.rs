use teloxide::{types::ChatId, RequestError};

use crate::bot::{
    dispatcher::{BotContext, State},
    processor::{
        end_dialogue, make_withdraw_request, parse_withdraw_amount, set_state, ProcessError,
        WithdrawRequest,
    },
};

use super::{
    constants::{
        ADDRESS_PROMPT_MESSAGE, AMOUNT_PROMPT_MESSAGE, INVALID_ADDRESS_MESSAGE,
        INVALID_NUMBER_MESSAGE, INVALID_RANGE_MESSAGE, SPAM_MESSAGE,
    },
    utils::{
        display_admin_notification, display_error, display_withdraw_confirmation,
        send_bot_message, HandlerResult,
    },
};

/* Utilities */

// Relays a request to the user and to the admin chat.
async fn submit_withdraw_request(
    ctx: &BotContext,
    request: &WithdrawRequest,
) -> Result<(), RequestError> {
    send_bot_message(ctx, request.user_id, display_withdraw_confirmation(request)).await?;
    send_bot_message(ctx, ctx.admin_id, display_admin_notification(request)).await?;
    Ok(())
}

/* Action handler functions */

/* Withdraw command.
 * Entrypoint to the dialogue sequence. A repeated command is rejected as spam
 * and leaves any pending dialogue as it was.
 */
pub async fn action_withdraw(ctx: &BotContext, user_id: ChatId, is_spam: bool) -> HandlerResult {
    if is_spam {
        log::info!("Spam withdraw command from user {}", user_id.0);
        send_bot_message(ctx, user_id, SPAM_MESSAGE).await?;
        return Ok(());
    }

    send_bot_message(ctx, user_id, AMOUNT_PROMPT_MESSAGE).await?;
    set_state(&ctx.store, user_id, State::AwaitingAmount)?;
    Ok(())
}

/* Receives the withdrawal amount.
 * A bad amount ends the dialogue; the user has to start over with the command.
 */
pub async fn action_withdraw_amount(ctx: &BotContext, user_id: ChatId, text: &str) -> HandlerResult {
    end_dialogue(&ctx.store, user_id)?;

    match parse_withdraw_amount(text) {
        Ok(amount) => {
            send_bot_message(ctx, user_id, ADDRESS_PROMPT_MESSAGE).await?;
            set_state(&ctx.store, user_id, State::AwaitingAddress { amount })?;
        }
        Err(ProcessError::InvalidNumber) => {
            log::info!("User {} sent a non-numeric amount: {:?}", user_id.0, text);
            send_bot_message(ctx, user_id, INVALID_NUMBER_MESSAGE).await?;
        }
        Err(ProcessError::AmountOutOfRange(amount)) => {
            log::info!("User {} sent an out of range amount: {}", user_id.0, amount);
            send_bot_message(ctx, user_id, INVALID_RANGE_MESSAGE).await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/* Receives the wallet address line and submits the request.
 * The dialogue ends here whatever the outcome. Delivery failures are reported
 * back to the user instead of being retried.
 */
pub async fn action_withdraw_address(
    ctx: &BotContext,
    user_id: ChatId,
    text: &str,
    amount: i64,
) -> HandlerResult {
    end_dialogue(&ctx.store, user_id)?;

    let request = match make_withdraw_request(user_id, amount, text) {
        Ok(request) => request,
        Err(ProcessError::InvalidAddressFormat) => {
            log::info!("User {} sent a malformed address line: {:?}", user_id.0, text);
            send_bot_message(ctx, user_id, INVALID_ADDRESS_MESSAGE).await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    match submit_withdraw_request(ctx, &request).await {
        Ok(()) => {
            log::info!(
                "Withdraw request submitted for user {}: {} Paws to {}",
                request.user_id.0,
                request.amount,
                request.wallet_address
            );
        }
        Err(err) => {
            log::error!(
                "Withdraw request for user {} could not be delivered {:?}: {}",
                request.user_id.0,
                request,
                err
            );
            send_bot_message(ctx, user_id, display_error(&err)).await?;
        }
    }
    Ok(())
}
