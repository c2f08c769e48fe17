// Exported functions
pub use self::general::{action_start, invalid_state};
pub use self::withdraw::{action_withdraw, action_withdraw_address, action_withdraw_amount};

// Submodules
pub mod constants;
mod general;
mod utils;
mod withdraw;
