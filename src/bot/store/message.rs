use teloxide::types::ChatId;

use super::connect::Tables;

/* Last message CRUD Operations
 * Tracks only the latest normalized text received from each user.
 * Has set and get operations.
 */

// Sets the last message of a user, returning the previous one
pub fn set_last_message(con: &mut Tables, user_id: ChatId, text: String) -> Option<String> {
    con.last_messages.insert(user_id, text)
}

// Gets the last message of a user
// Mainly for testing purposes
#[allow(dead_code)]
pub fn get_last_message(con: &Tables, user_id: ChatId) -> Option<&str> {
    con.last_messages.get(&user_id).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_last_message() {
        let mut con = Tables::default();
        let user_id = ChatId(12345678901);

        assert_eq!(set_last_message(&mut con, user_id, "hi".to_string()), None);
        assert_eq!(
            set_last_message(&mut con, user_id, "bye".to_string()),
            Some("hi".to_string())
        );
        assert_eq!(get_last_message(&con, user_id), Some("bye"));
    }

    #[test]
    fn test_last_message_per_user() {
        let mut con = Tables::default();
        set_last_message(&mut con, ChatId(1), "one".to_string());
        set_last_message(&mut con, ChatId(2), "two".to_string());

        assert_eq!(get_last_message(&con, ChatId(1)), Some("one"));
        assert_eq!(get_last_message(&con, ChatId(2)), Some("two"));
    }
}
