use chrono::{SubsecRound, Utc};

use crate::cache::BOOKINGS_KEY;
use crate::id::generate_local_id;
use crate::models::{BookingRecord, CustomerDetails, RestaurantInfo, TableStatus};
use crate::remote::{Direction, Query, RemoteError};

use super::{DataContext, DataSource, RestaurantRepository, Sourced, SyncOutcome};

pub const DEFAULT_BOOKINGS_LIMIT: usize = 10;

/// Booking creation and lookup. A successful booking also marks its table
/// as booked through the restaurant repository.
#[derive(Clone)]
pub struct BookingRepository {
    ctx: DataContext,
    restaurants: RestaurantRepository,
}

impl BookingRepository {
    pub fn new(ctx: DataContext) -> Self {
        let restaurants = RestaurantRepository::new(ctx.clone());
        Self { ctx, restaurants }
    }

    pub fn restaurants(&self) -> &RestaurantRepository {
        &self.restaurants
    }

    /// Records a confirmed booking. Prefers the remote store; falls back to
    /// a locally generated id. Never fails.
    pub async fn create_booking(
        &self,
        info: RestaurantInfo,
        customer: CustomerDetails,
    ) -> BookingRecord {
        self.create_booking_sourced(info, customer).await.value
    }

    pub(crate) async fn create_booking_sourced(
        &self,
        info: RestaurantInfo,
        customer: CustomerDetails,
    ) -> Sourced<BookingRecord> {
        // Millisecond precision, matching what the stores keep.
        let record = BookingRecord::new(info, customer, Utc::now().trunc_subsecs(3));

        if self.ctx.is_online().await {
            match self.insert_remote(&record).await {
                Ok(id) => {
                    let record = record.with_id(id);
                    tracing::info!(
                        "Booking {} created for {} table {}",
                        record.id,
                        record.restaurant_name,
                        record.table_number
                    );
                    let outcome = self
                        .restaurants
                        .update_table_status_outcome(
                            &record.restaurant_name,
                            record.table_number,
                            TableStatus::Booked,
                        )
                        .await;
                    if outcome != SyncOutcome::Synced {
                        tracing::debug!("Table status for booking {} is {:?}", record.id, outcome);
                    }
                    self.append_local(&record);
                    return Sourced::new(record, DataSource::Remote);
                }
                Err(e) => tracing::warn!("Error creating booking in remote store: {}", e),
            }
        }

        let record = record.with_id(generate_local_id());
        self.append_local(&record);
        self.restaurants.update_local_restaurant_table_status(
            &record.restaurant_name,
            record.table_number,
            TableStatus::Booked,
        );
        tracing::debug!("Booking {} stored locally", record.id);
        Sourced::new(record, DataSource::LocalCache)
    }

    async fn insert_remote(&self, record: &BookingRecord) -> Result<String, RemoteError> {
        let collection = &self.ctx.collections().bookings;
        self.ctx
            .call_remote(self.ctx.store().insert_one(collection, record.to_fields()))
            .await
    }

    fn local_bookings(&self) -> Vec<BookingRecord> {
        self.ctx
            .cache()
            .load::<Vec<BookingRecord>>(BOOKINGS_KEY)
            .unwrap_or_default()
    }

    fn append_local(&self, record: &BookingRecord) {
        let mut bookings = self.local_bookings();
        bookings.push(record.clone());
        self.ctx.cache().store(BOOKINGS_KEY, &bookings);
    }

    /// Looks a booking up by id, remote first. Returns `None` when neither
    /// the remote store nor the local cache has it.
    pub async fn fetch_booking_details(&self, id: &str) -> Option<BookingRecord> {
        self.fetch_booking_details_sourced(id).await.map(|found| found.value)
    }

    pub(crate) async fn fetch_booking_details_sourced(
        &self,
        id: &str,
    ) -> Option<Sourced<BookingRecord>> {
        if self.ctx.is_online().await {
            match self.fetch_remote_by_id(id).await {
                Ok(Some(record)) => return Some(Sourced::new(record, DataSource::Remote)),
                Ok(None) => tracing::debug!("Booking {} not in remote store", id),
                Err(e) => tracing::warn!("Error fetching booking {} from remote store: {}", id, e),
            }
        }

        self.local_bookings()
            .into_iter()
            .find(|b| b.id == id)
            .map(|record| Sourced::new(record, DataSource::LocalCache))
    }

    async fn fetch_remote_by_id(&self, id: &str) -> Result<Option<BookingRecord>, RemoteError> {
        let collection = &self.ctx.collections().bookings;
        let docs = self
            .ctx
            .call_remote(self.ctx.store().query(collection, &Query::by_id(id)))
            .await?;

        Ok(docs.iter().find_map(|doc| match BookingRecord::from_document(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Quarantined remote document: {}", e);
                None
            }
        }))
    }

    /// The most recent bookings, newest first, at most `limit` of them.
    pub async fn fetch_all_bookings(&self, limit: usize) -> Vec<BookingRecord> {
        self.fetch_all_bookings_sourced(limit).await.value
    }

    pub(crate) async fn fetch_all_bookings_sourced(
        &self,
        limit: usize,
    ) -> Sourced<Vec<BookingRecord>> {
        if self.ctx.is_online().await {
            match self.fetch_remote_page(limit).await {
                Ok(page) if !page.is_empty() => {
                    self.ctx.cache().store(BOOKINGS_KEY, &page);
                    return Sourced::new(page, DataSource::Remote);
                }
                Ok(_) => tracing::debug!("Remote store has no bookings, using local data"),
                Err(e) => tracing::warn!("Error fetching bookings from remote store: {}", e),
            }
        }

        let mut bookings = self.local_bookings();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings.truncate(limit);
        Sourced::new(bookings, DataSource::LocalCache)
    }

    async fn fetch_remote_page(&self, limit: usize) -> Result<Vec<BookingRecord>, RemoteError> {
        let collection = &self.ctx.collections().bookings;
        let query = Query::all()
            .order_by("createdAt", Direction::Desc)
            .limit(limit);
        let docs = self
            .ctx
            .call_remote(self.ctx.store().query(collection, &query))
            .await?;

        Ok(docs
            .iter()
            .filter_map(|doc| match BookingRecord::from_document(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Quarantined remote document: {}", e);
                    None
                }
            })
            .collect())
    }
}
