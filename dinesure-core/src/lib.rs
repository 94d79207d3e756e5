//! DineSure Core Library
//!
//! Restaurant listings and table bookings backed by a remote document store,
//! with a local cache that keeps the client usable while offline.

pub mod api;
pub mod cache;
pub mod connectivity;
pub mod id;
pub mod mock;
pub mod models;
pub mod remote;
pub mod repository;

pub use api::DataAccess;
pub use cache::{
    CacheError, FileStorage, KeyValueStorage, LocalCacheStore, MemoryStorage, StorageError,
};
pub use connectivity::{ConnectivityFlag, ConnectivityOracle, TcpProbe};
pub use models::{
    BookingRecord, BookingStatus, CustomerDetails, Restaurant, RestaurantInfo, RestaurantTable,
    SchemaError, TableStatus, VegFilter, DISPLAY_DATE_FORMAT,
};
pub use remote::{HttpRemoteStore, MemoryRemoteStore, RemoteError, RemoteStore};
pub use repository::{
    BookingRepository, CollectionNames, DataContext, RepositoryOptions, RestaurantRepository,
    DEFAULT_BOOKINGS_LIMIT,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
