pub use entity::{connected_accounts, Id};

pub mod connected_account;
pub mod error;
