//! In-memory implementations of the storage contracts, for tests and dev.
//!
//! Each store keeps its tables behind a single `RwLock`, so every operation
//! (including uniqueness checks) is atomic with respect to the others.

pub mod accounts;
pub mod catalog;
pub mod sessions;

pub use accounts::InMemoryAccountStore;
pub use catalog::InMemoryCatalog;
pub use sessions::InMemorySessionStore;

pub(crate) const POISONED: &str = "lock poisoned";
