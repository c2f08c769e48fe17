use chrono::{Duration, Utc};
use teloxide::types::ChatId;

use super::{
    dispatcher::State,
    store::{
        check_repeated_message, exit_dialogue, get_dialogue_state, purge_expired_dialogues,
        update_dialogue_state, update_user, Store, StoreError,
    },
};

/* Processor is the overall logic center of the bot.
 * It validates user input and applies state changes to the store,
 * without ever talking to the user. Handlers turn its results and errors
 * into messages.
 */

pub const MIN_WITHDRAW_AMOUNT: i64 = 200;
pub const MAX_WITHDRAW_AMOUNT: i64 = 10000;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProcessError {
    #[error("{0}")]
    StoreError(StoreError),
    #[error("Invalid number provided")]
    InvalidNumber,
    #[error("Amount {0} is outside the 200-10000 range")]
    AmountOutOfRange(i64),
    #[error("Wallet address line needs at least two words")]
    InvalidAddressFormat,
}

// Implement the From trait to convert from StoreError to ProcessError
impl From<StoreError> for ProcessError {
    fn from(store_error: StoreError) -> ProcessError {
        ProcessError::StoreError(store_error)
    }
}

/* A validated withdrawal, ready to be relayed to the admin.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawRequest {
    pub user_id: ChatId,
    pub amount: i64,
    pub wallet_address: String,
}

/* Registers a user on their first start. Later calls change nothing.
 */
pub fn register_user(store: &Store, user_id: ChatId) -> Result<(), ProcessError> {
    if update_user(store, user_id)? {
        log::info!("Registered new user {}", user_id.0);
    }
    Ok(())
}

/* Spam check.
 * A message is spam if, once trimmed and lowercased, it equals the previous
 * message from the same user. The current message always becomes the new
 * previous message.
 */
pub fn is_spam(store: &Store, user_id: ChatId, text: &str) -> Result<bool, ProcessError> {
    let normalized = text.trim().to_lowercase();
    Ok(check_repeated_message(store, user_id, &normalized)?)
}

// Parses a withdrawal amount and checks it against the allowed range.
pub fn parse_withdraw_amount(text: &str) -> Result<i64, ProcessError> {
    let amount = text
        .trim()
        .parse::<i64>()
        .map_err(|_| ProcessError::InvalidNumber)?;

    if (MIN_WITHDRAW_AMOUNT..=MAX_WITHDRAW_AMOUNT).contains(&amount) {
        Ok(amount)
    } else {
        Err(ProcessError::AmountOutOfRange(amount))
    }
}

/* Parses a wallet address line, e.g. `/pawsaddress XYZ123`.
 * The address is the second word. The first word is not checked, and any
 * words after the address are ignored.
 */
pub fn parse_wallet_address(text: &str) -> Result<String, ProcessError> {
    let mut words = text.split_whitespace();
    match (words.next(), words.next()) {
        (Some(_), Some(address)) => Ok(address.to_string()),
        _ => Err(ProcessError::InvalidAddressFormat),
    }
}

/* Builds the withdrawal request for a confirmed address line.
 */
pub fn make_withdraw_request(
    user_id: ChatId,
    amount: i64,
    text: &str,
) -> Result<WithdrawRequest, ProcessError> {
    let wallet_address = parse_wallet_address(text)?;
    Ok(WithdrawRequest {
        user_id,
        amount,
        wallet_address,
    })
}

/* Dialogue operations */

pub fn get_state(store: &Store, user_id: ChatId, timeout: Duration) -> Result<State, ProcessError> {
    Ok(get_dialogue_state(store, user_id, Utc::now(), timeout)?)
}

pub fn set_state(store: &Store, user_id: ChatId, state: State) -> Result<(), ProcessError> {
    log::debug!("User {} moves to state {:?}", user_id.0, state);
    Ok(update_dialogue_state(store, user_id, state, Utc::now())?)
}

pub fn end_dialogue(store: &Store, user_id: ChatId) -> Result<(), ProcessError> {
    Ok(exit_dialogue(store, user_id)?)
}

pub fn purge_expired(store: &Store, timeout: Duration) -> Result<usize, ProcessError> {
    Ok(purge_expired_dialogues(store, Utc::now(), timeout)?)
}
