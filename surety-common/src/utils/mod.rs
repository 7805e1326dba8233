//! Common identity types shared across the workspace.

pub mod account_id;
pub use account_id::AccountId;
