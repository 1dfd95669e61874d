//! "My tickets" and "profile" pages of the signed-in user.

pub mod environment;
pub mod reducer;
pub mod types;

pub use environment::AccountEnvironment;
pub use reducer::AccountReducer;
pub use types::{AccountAction, AccountState};
