use teloxide::types::ChatId;

use super::connect::Tables;

/* User CRUD Operations
 * UserState holds the reward counters of a user.
 * Both counters are created together, at zero, and are not changed afterwards.
 * Has add, exists, and get operations.
 */
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UserState {
    pub points: i64,
    pub referral_count: i64,
}

// Adds a new user with zeroed counters
pub fn add_user(con: &mut Tables, user_id: ChatId) {
    con.users.insert(user_id, UserState::default());
}

// Checks if a user exists
pub fn get_user_exists(con: &Tables, user_id: ChatId) -> bool {
    con.users.contains_key(&user_id)
}

// Gets a user
pub fn get_user(con: &Tables, user_id: ChatId) -> Option<UserState> {
    con.users.get(&user_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_user() {
        let mut con = Tables::default();
        let user_id = ChatId(123456789);

        assert!(!get_user_exists(&con, user_id));
        add_user(&mut con, user_id);
        assert!(get_user_exists(&con, user_id));
        assert_eq!(
            get_user(&con, user_id),
            Some(UserState {
                points: 0,
                referral_count: 0
            })
        );
    }

    #[test]
    fn test_get_missing_user() {
        let con = Tables::default();
        assert_eq!(get_user(&con, ChatId(987654321)), None);
    }
}
