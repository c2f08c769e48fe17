// bot/mod.rs

// Exported functions
pub use self::dispatcher::{dispatch_text, dispatch_update, run_bot};

// Exported structs and types
pub use self::config::{BotConfig, ConfigError};
pub use self::dispatcher::{BotContext, BotError, Command, HandlerResult, RunError, State};
pub use self::messenger::Messenger;
pub use self::processor::{ProcessError, WithdrawRequest};
pub use self::store::{Store, StoreError, UserState};

// Declare submodules
mod config;
mod dispatcher;
mod handler;
mod listener;
mod messenger;
mod processor;
mod server;
mod store;
