use chrono::{DateTime, Duration, Utc};
use teloxide::types::ChatId;

use crate::bot::dispatcher::State;

use super::connect::Tables;

/* Dialogue CRUD Operations
 * A dialogue is the pending step of a user's conversation, stamped with the
 * time it was last advanced. Idle users have no dialogue entry.
 * Has set, get, delete, and purge operations.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Dialogue {
    pub state: State,
    pub updated_at: DateTime<Utc>,
}

impl Dialogue {
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.updated_at > timeout
    }
}

// Sets the dialogue of a user
pub fn set_dialogue(con: &mut Tables, user_id: ChatId, state: State, now: DateTime<Utc>) {
    con.dialogues.insert(
        user_id,
        Dialogue {
            state,
            updated_at: now,
        },
    );
}

// Gets the dialogue of a user
pub fn get_dialogue(con: &Tables, user_id: ChatId) -> Option<&Dialogue> {
    con.dialogues.get(&user_id)
}

// Deletes the dialogue of a user
pub fn delete_dialogue(con: &mut Tables, user_id: ChatId) -> Option<Dialogue> {
    con.dialogues.remove(&user_id)
}

// Deletes all expired dialogues, returns the number removed
pub fn delete_expired_dialogues(con: &mut Tables, now: DateTime<Utc>, timeout: Duration) -> usize {
    let before = con.dialogues.len();
    con.dialogues
        .retain(|_, dialogue| !dialogue.is_expired(now, timeout));
    before - con.dialogues.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete_dialogue() {
        let mut con = Tables::default();
        let user_id = ChatId(42);
        let now = Utc::now();

        set_dialogue(&mut con, user_id, State::AwaitingAmount, now);
        assert_eq!(
            get_dialogue(&con, user_id).map(|dialogue| dialogue.state.clone()),
            Some(State::AwaitingAmount)
        );

        assert!(delete_dialogue(&mut con, user_id).is_some());
        assert!(get_dialogue(&con, user_id).is_none());
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let dialogue = Dialogue {
            state: State::AwaitingAmount,
            updated_at: now - Duration::seconds(61),
        };

        assert!(dialogue.is_expired(now, Duration::seconds(60)));
        assert!(!dialogue.is_expired(now, Duration::seconds(120)));
    }

    #[test]
    fn test_delete_expired_dialogues() {
        let mut con = Tables::default();
        let now = Utc::now();
        let timeout = Duration::seconds(60);

        set_dialogue(&mut con, ChatId(1), State::AwaitingAmount, now - Duration::seconds(300));
        set_dialogue(
            &mut con,
            ChatId(2),
            State::AwaitingAddress { amount: 500 },
            now - Duration::seconds(10),
        );

        assert_eq!(delete_expired_dialogues(&mut con, now, timeout), 1);
        assert!(get_dialogue(&con, ChatId(1)).is_none());
        assert!(get_dialogue(&con, ChatId(2)).is_some());
    }
}
