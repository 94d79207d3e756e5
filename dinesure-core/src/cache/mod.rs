//! Local cache: a JSON mirror of the remote collections kept in persistent
//! key-value storage.
//!
//! Two keys are used:
//! - `restaurants`: the full, unfiltered restaurant list
//! - `bookings`: every booking this client knows about

mod storage;
mod store;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CacheError, LocalCacheStore};

pub const RESTAURANTS_KEY: &str = "restaurants";
pub const BOOKINGS_KEY: &str = "bookings";
