// Exported functions
pub use self::manager::{
    check_repeated_message, exit_dialogue, get_dialogue_state, purge_expired_dialogues,
    update_dialogue_state, update_user,
};
#[cfg(test)]
pub use self::manager::get_user;

// Exported structs and types
pub use self::connect::{Store, StoreError};
pub use self::user::UserState;

// Submodules
mod connect;
mod dialogue;
mod manager;
mod message;
mod user;
