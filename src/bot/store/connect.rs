use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use teloxide::types::ChatId;

use super::{dialogue::Dialogue, user::UserState};

/* Store is the in-memory home of all bot state.
 * It is created once at startup and handed to the handlers explicitly.
 * Everything lives for the lifetime of the process; nothing is persisted.
 */
#[derive(Default)]
pub struct Store {
    tables: Mutex<Tables>,
}

// Raw tables, only reachable through a locked connection.
#[derive(Default)]
pub struct Tables {
    pub users: HashMap<ChatId, UserState>,
    pub last_messages: HashMap<ChatId, String>,
    pub dialogues: HashMap<ChatId, Dialogue>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_poison_error: PoisonError<T>) -> StoreError {
        StoreError::Poisoned
    }
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    // Locks the tables. Must never be held across an await point.
    pub fn connect(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        Ok(self.tables.lock()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect() {
        let store = Store::new();
        let con = store.connect().unwrap();
        assert!(con.users.is_empty());
        assert!(con.last_messages.is_empty());
        assert!(con.dialogues.is_empty());
    }

    #[test]
    fn test_poisoned_store() {
        let store = std::sync::Arc::new(Store::new());
        let clone = store.clone();
        let _ = std::thread::spawn(move || {
            let _con = clone.connect().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.connect().err(), Some(StoreError::Poisoned));
    }
}
