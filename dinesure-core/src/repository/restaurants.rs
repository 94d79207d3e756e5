use crate::cache::RESTAURANTS_KEY;
use crate::mock::generate_mock_restaurants;
use crate::models::{Restaurant, TableStatus, VegFilter};
use crate::remote::{Document, Fields, Query, RemoteError};

use super::{DataContext, DataSource, Sourced, SyncOutcome};

/// Restaurant listings and table-status updates.
///
/// Restaurants are joined by `name`, not `id`: when two restaurants share a
/// name, the first match is the one updated.
#[derive(Clone)]
pub struct RestaurantRepository {
    ctx: DataContext,
}

impl RestaurantRepository {
    pub fn new(ctx: DataContext) -> Self {
        Self { ctx }
    }

    /// Lists restaurants, remote first, then the local cache, then the mock
    /// seed data. Never fails.
    pub async fn fetch_restaurants(&self, filter: impl Into<VegFilter>) -> Vec<Restaurant> {
        self.fetch_restaurants_sourced(filter.into()).await.value
    }

    pub(crate) async fn fetch_restaurants_sourced(
        &self,
        filter: VegFilter,
    ) -> Sourced<Vec<Restaurant>> {
        if self.ctx.is_online().await {
            match self.fetch_remote(filter).await {
                Ok(restaurants) if !restaurants.is_empty() => {
                    self.mirror_remote(filter, &restaurants);
                    return Sourced::new(restaurants, DataSource::Remote);
                }
                Ok(_) => tracing::debug!("Remote store has no restaurants, using local data"),
                Err(e) => tracing::warn!("Error fetching restaurants from remote store: {}", e),
            }
        }

        if let Some(local) = self.ctx.cache().load::<Vec<Restaurant>>(RESTAURANTS_KEY) {
            return Sourced::new(filter.apply(local), DataSource::LocalCache);
        }

        tracing::debug!("No local restaurant data, generating mock restaurants");
        Sourced::new(
            generate_mock_restaurants(self.ctx.cache(), filter),
            DataSource::MockSeed,
        )
    }

    async fn fetch_remote(&self, filter: VegFilter) -> Result<Vec<Restaurant>, RemoteError> {
        let query = match filter.as_flag() {
            Some(veg) => Query::where_eq("isVeg", veg),
            None => Query::all(),
        };
        let collection = &self.ctx.collections().restaurants;
        let docs = self
            .ctx
            .call_remote(self.ctx.store().query(collection, &query))
            .await?;

        Ok(filter.apply(decode_restaurants(&docs)))
    }

    /// Keeps the cached list unfiltered. A filtered remote page replaces the
    /// cached restaurants of that kind and leaves the other kind in place.
    fn mirror_remote(&self, filter: VegFilter, fetched: &[Restaurant]) {
        let mirror = match filter {
            VegFilter::All => fetched.to_vec(),
            _ => {
                let mut merged = fetched.to_vec();
                let kept = self
                    .ctx
                    .cache()
                    .load::<Vec<Restaurant>>(RESTAURANTS_KEY)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|r| !filter.matches(r) && !fetched.iter().any(|f| f.id == r.id));
                merged.extend(kept);
                merged
            }
        };
        self.ctx.cache().store(RESTAURANTS_KEY, &mirror);
    }

    /// Sets one table's status. Best effort: remote failures are logged and
    /// swallowed, and the local cache is updated either way.
    pub async fn update_restaurant_table_status(
        &self,
        restaurant_name: &str,
        table_number: u32,
        status: TableStatus,
    ) {
        self.update_table_status_outcome(restaurant_name, table_number, status)
            .await;
    }

    pub(crate) async fn update_table_status_outcome(
        &self,
        restaurant_name: &str,
        table_number: u32,
        status: TableStatus,
    ) -> SyncOutcome {
        let outcome = if self.ctx.is_online().await {
            match self
                .update_remote_table_status(restaurant_name, table_number, status)
                .await
            {
                Ok(true) => SyncOutcome::Synced,
                Ok(false) => {
                    tracing::debug!(
                        "No remote restaurant named '{}', updating local copy only",
                        restaurant_name
                    );
                    SyncOutcome::LocalOnly
                }
                Err(e) => {
                    tracing::warn!("Error updating restaurant in remote store: {}", e);
                    SyncOutcome::Failed
                }
            }
        } else {
            SyncOutcome::LocalOnly
        };

        self.update_local_restaurant_table_status(restaurant_name, table_number, status);
        outcome
    }

    /// Returns `Ok(false)` when the remote store has no usable restaurant
    /// with that name.
    async fn update_remote_table_status(
        &self,
        restaurant_name: &str,
        table_number: u32,
        status: TableStatus,
    ) -> Result<bool, RemoteError> {
        let collection = &self.ctx.collections().restaurants;
        let docs = self
            .ctx
            .call_remote(
                self.ctx
                    .store()
                    .query(collection, &Query::where_eq("name", restaurant_name)),
            )
            .await?;

        let Some(doc) = docs.first() else {
            return Ok(false);
        };
        let restaurant = match Restaurant::from_document(doc) {
            Ok(restaurant) => restaurant,
            Err(e) => {
                tracing::warn!("Cannot update table status: {}", e);
                return Ok(false);
            }
        };

        let tables = restaurant.tables_with_status(table_number, status);
        let mut fields = Fields::new();
        fields.insert(
            "tables".to_string(),
            serde_json::to_value(&tables).map_err(|e| RemoteError::Malformed(e.to_string()))?,
        );

        self.ctx
            .call_remote(self.ctx.store().replace_fields(collection, &doc.id, fields))
            .await?;
        Ok(true)
    }

    /// Applies a table-status change to the cached restaurant list. Returns
    /// whether a cached restaurant with that name was found.
    pub fn update_local_restaurant_table_status(
        &self,
        restaurant_name: &str,
        table_number: u32,
        status: TableStatus,
    ) -> bool {
        let Some(mut restaurants) = self.ctx.cache().load::<Vec<Restaurant>>(RESTAURANTS_KEY)
        else {
            return false;
        };

        let Some(restaurant) = restaurants.iter_mut().find(|r| r.name == restaurant_name) else {
            return false;
        };
        restaurant.tables = restaurant.tables_with_status(table_number, status);

        self.ctx.cache().store(RESTAURANTS_KEY, &restaurants);
        true
    }
}

/// Decodes restaurant documents, skipping the ones that fail validation.
fn decode_restaurants(docs: &[Document]) -> Vec<Restaurant> {
    docs.iter()
        .filter_map(|doc| match Restaurant::from_document(doc) {
            Ok(restaurant) => Some(restaurant),
            Err(e) => {
                tracing::warn!("Quarantined remote document: {}", e);
                None
            }
        })
        .collect()
}
