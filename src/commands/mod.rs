mod book;
mod bookings;
mod config_cmd;
mod restaurants;

pub use book::BookCommand;
pub use bookings::BookingsCommand;
pub use config_cmd::ConfigCommand;
pub use restaurants::RestaurantsCommand;

use std::sync::Arc;

use clap::ValueEnum;
use dinesure_core::{
    ConnectivityFlag, ConnectivityOracle, DataAccess, DataContext, FileStorage, HttpRemoteStore,
    LocalCacheStore, MemoryRemoteStore, RemoteStore, TcpProbe,
};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Wires the data-access layer from configuration: the HTTP store behind a
/// TCP reachability probe when a remote URL is set, local data only
/// otherwise.
pub fn open_data_access(config: &Config) -> Result<DataAccess, Box<dyn std::error::Error>> {
    let cache = LocalCacheStore::new(FileStorage::new(config.data_dir.value.clone()));

    let (store, connectivity): (Arc<dyn RemoteStore>, Arc<dyn ConnectivityOracle>) =
        match &config.remote.url {
            Some(url) if !config.offline.value => {
                let probe = TcpProbe::for_url(url)
                    .ok_or_else(|| format!("Invalid remote URL: {}", url))?;
                let mut store = HttpRemoteStore::new(url.clone());
                if let Some(key) = &config.remote.api_key {
                    store = store.with_api_key(key.clone());
                }
                (Arc::new(store), Arc::new(probe))
            }
            _ => {
                tracing::debug!("No remote store in use, working from local data");
                // Never contacted: the oracle always reports offline.
                (
                    Arc::new(MemoryRemoteStore::new()),
                    Arc::new(ConnectivityFlag::offline()),
                )
            }
        };

    let ctx = DataContext::new(store, connectivity, cache)
        .with_options(config.remote.repository_options());
    Ok(DataAccess::new(ctx))
}
