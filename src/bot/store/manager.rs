use chrono::{DateTime, Duration, Utc};
use teloxide::types::ChatId;

use crate::bot::dispatcher::State;

use super::{
    connect::{Store, StoreError},
    dialogue::{delete_dialogue, delete_expired_dialogues, get_dialogue, set_dialogue},
    message::set_last_message,
    user::{self, add_user, get_user_exists, UserState},
};

/* Store Manager
 * Manager exposes the only operations the rest of the bot may perform on the
 * store. Each operation takes the lock once, so every call is atomic.
 */

/* Adds a user with zeroed counters if not already present.
 * Returns true if the user was newly created.
 */
pub fn update_user(store: &Store, user_id: ChatId) -> Result<bool, StoreError> {
    let mut con = store.connect()?;

    if get_user_exists(&con, user_id) {
        return Ok(false);
    }

    add_user(&mut con, user_id);
    Ok(true)
}

/* Gets the state of a user, if they have ever started the bot.
 * Mainly for testing purposes.
 */
#[allow(dead_code)]
pub fn get_user(store: &Store, user_id: ChatId) -> Result<Option<UserState>, StoreError> {
    let con = store.connect()?;
    Ok(user::get_user(&con, user_id))
}

/* Records a normalized message as the user's latest, and reports whether it
 * repeats the one before it. The record is always overwritten.
 */
pub fn check_repeated_message(
    store: &Store,
    user_id: ChatId,
    normalized_text: &str,
) -> Result<bool, StoreError> {
    let mut con = store.connect()?;

    let previous = set_last_message(&mut con, user_id, normalized_text.to_string());
    Ok(previous.as_deref() == Some(normalized_text))
}

/* Gets the dialogue state of a user.
 * Users with no dialogue are Idle. An expired dialogue is removed and read as Idle.
 */
pub fn get_dialogue_state(
    store: &Store,
    user_id: ChatId,
    now: DateTime<Utc>,
    timeout: Duration,
) -> Result<State, StoreError> {
    let mut con = store.connect()?;

    let dialogue = match get_dialogue(&con, user_id) {
        Some(dialogue) => dialogue.clone(),
        None => return Ok(State::Idle),
    };

    if dialogue.is_expired(now, timeout) {
        delete_dialogue(&mut con, user_id);
        log::info!(
            "Dialogue for user {} expired in state {:?}",
            user_id.0,
            dialogue.state
        );
        return Ok(State::Idle);
    }

    Ok(dialogue.state)
}

/* Moves a user to a new dialogue state. Moving to Idle removes the dialogue.
 */
pub fn update_dialogue_state(
    store: &Store,
    user_id: ChatId,
    state: State,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let mut con = store.connect()?;

    match state {
        State::Idle => {
            delete_dialogue(&mut con, user_id);
        }
        state => set_dialogue(&mut con, user_id, state, now),
    }
    Ok(())
}

/* Ends the dialogue of a user, if any.
 */
pub fn exit_dialogue(store: &Store, user_id: ChatId) -> Result<(), StoreError> {
    let mut con = store.connect()?;

    delete_dialogue(&mut con, user_id);
    Ok(())
}

/* Removes every dialogue that has not advanced within the timeout.
 * Returns the number of dialogues removed.
 */
pub fn purge_expired_dialogues(
    store: &Store,
    now: DateTime<Utc>,
    timeout: Duration,
) -> Result<usize, StoreError> {
    let mut con = store.connect()?;
    Ok(delete_expired_dialogues(&mut con, now, timeout))
}
