//! Player Profiles
//!
//! User records and their persistence. Not part of the deterministic core.

pub mod store;
pub mod user;

pub use store::{JsonFileStore, MemoryStore, StoreError, UserStore};
pub use user::User;
