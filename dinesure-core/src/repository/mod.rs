//! Remote-first repositories with local cache fallback.
//!
//! Every operation follows the same shape: consult the connectivity oracle,
//! try the remote store if online, and settle on the local cache when the
//! remote is unreachable, fails, or returns nothing. Remote calls are
//! awaited to completion before the local path runs; nothing races.
//!
//! Failures never reach the caller. Internally each fetch reports where its
//! data came from ([`DataSource`]) and each table-status write reports how
//! far it got ([`SyncOutcome`]), which keeps the fallback policy testable.

mod bookings;
mod restaurants;

pub use bookings::{BookingRepository, DEFAULT_BOOKINGS_LIMIT};
pub use restaurants::RestaurantRepository;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::LocalCacheStore;
use crate::connectivity::ConnectivityOracle;
use crate::remote::{RemoteError, RemoteStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub restaurants: String,
    pub bookings: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            restaurants: "restaurants".to_string(),
            bookings: "restaurant_orders".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryOptions {
    pub collections: CollectionNames,
    /// Upper bound for a single remote call. `None` waits indefinitely.
    pub remote_timeout: Option<Duration>,
}

/// The collaborators shared by both repositories, injected at construction.
#[derive(Clone)]
pub struct DataContext {
    store: Arc<dyn RemoteStore>,
    connectivity: Arc<dyn ConnectivityOracle>,
    cache: LocalCacheStore,
    options: RepositoryOptions,
}

impl DataContext {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        connectivity: Arc<dyn ConnectivityOracle>,
        cache: LocalCacheStore,
    ) -> Self {
        Self {
            store,
            connectivity,
            cache,
            options: RepositoryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RepositoryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cache(&self) -> &LocalCacheStore {
        &self.cache
    }

    /// Asks the oracle on the blocking pool, since a check may wait on the
    /// network.
    pub(crate) async fn is_online(&self) -> bool {
        let oracle = Arc::clone(&self.connectivity);
        match tokio::task::spawn_blocking(move || oracle.is_online()).await {
            Ok(online) => online,
            Err(e) => {
                tracing::warn!("Connectivity check failed: {}", e);
                false
            }
        }
    }

    pub(crate) fn store(&self) -> &dyn RemoteStore {
        self.store.as_ref()
    }

    pub(crate) fn collections(&self) -> &CollectionNames {
        &self.options.collections
    }

    /// Awaits a remote call, bounded by the configured timeout.
    pub(crate) async fn call_remote<T, F>(&self, call: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        match self.options.remote_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| RemoteError::Timeout(limit))?,
            None => call.await,
        }
    }
}

/// Where a fetch result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataSource {
    Remote,
    LocalCache,
    MockSeed,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: DataSource) -> Self {
        Self { value, source }
    }
}

/// How far a table-status update propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncOutcome {
    /// Written to the remote store and mirrored locally.
    Synced,
    /// Offline, or the remote store has no such restaurant; local only.
    LocalOnly,
    /// The remote write failed; the local copy was still updated.
    Failed,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::connectivity::ConnectivityFlag;
    use crate::remote::MemoryRemoteStore;

    pub struct Harness {
        pub remote: Arc<MemoryRemoteStore>,
        pub flag: ConnectivityFlag,
        pub ctx: DataContext,
    }

    pub fn harness(online: bool) -> Harness {
        let remote = Arc::new(MemoryRemoteStore::new());
        let flag = ConnectivityFlag::new(online);
        let ctx = DataContext::new(
            remote.clone(),
            Arc::new(flag.clone()),
            LocalCacheStore::in_memory(),
        );
        Harness { remote, flag, ctx }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::harness;
    use super::*;
    use crate::remote::MemoryRemoteStore;
    use std::sync::{mpsc, Mutex};

    /// Online only once the async side releases it.
    struct GatedOracle(Mutex<mpsc::Receiver<()>>);

    impl ConnectivityOracle for GatedOracle {
        fn is_online(&self) -> bool {
            match self.0.lock() {
                Ok(rx) => rx.recv_timeout(Duration::from_secs(2)).is_ok(),
                Err(_) => false,
            }
        }
    }

    #[test]
    fn test_default_collection_names() {
        let names = CollectionNames::default();
        assert_eq!(names.restaurants, "restaurants");
        assert_eq!(names.bookings, "restaurant_orders");
    }

    #[tokio::test]
    async fn test_blocking_oracle_leaves_runtime_free() {
        let (tx, rx) = mpsc::channel();
        let ctx = DataContext::new(
            Arc::new(MemoryRemoteStore::new()),
            Arc::new(GatedOracle(Mutex::new(rx))),
            LocalCacheStore::in_memory(),
        );
        let release = tokio::spawn(async move {
            tokio::task::yield_now().await;
            tx.send(()).unwrap();
        });

        assert!(ctx.is_online().await);
        release.await.unwrap();
    }

    #[tokio::test]
    async fn test_flag_answer_passes_through() {
        let h = harness(false);
        assert!(!h.ctx.is_online().await);
        h.flag.set_online(true);
        assert!(h.ctx.is_online().await);
    }

    #[tokio::test]
    async fn test_call_remote_without_timeout_passes_through() {
        let h = harness(true);
        let result: Result<u32, RemoteError> = h.ctx.call_remote(async { Ok(5) }).await;
        assert_eq!(result.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_call_remote_times_out() {
        let h = harness(true);
        let ctx = h.ctx.with_options(RepositoryOptions {
            remote_timeout: Some(Duration::from_millis(20)),
            ..RepositoryOptions::default()
        });

        let result: Result<(), RemoteError> = ctx
            .call_remote(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(RemoteError::Timeout(_))));
    }
}
