//! The data-access surface handed to a front-end.

use crate::models::{BookingRecord, CustomerDetails, Restaurant, RestaurantInfo, VegFilter};
use crate::repository::{BookingRepository, DataContext, RestaurantRepository};

/// Listing restaurants, creating bookings and reading them back. None of
/// these operations fail: remote problems degrade to local or seed data.
#[derive(Clone)]
pub struct DataAccess {
    restaurants: RestaurantRepository,
    bookings: BookingRepository,
}

impl DataAccess {
    pub fn new(ctx: DataContext) -> Self {
        let bookings = BookingRepository::new(ctx);
        let restaurants = bookings.restaurants().clone();
        Self {
            restaurants,
            bookings,
        }
    }

    pub async fn fetch_restaurants(&self, filter: impl Into<VegFilter>) -> Vec<Restaurant> {
        self.restaurants.fetch_restaurants(filter).await
    }

    pub async fn create_booking(
        &self,
        info: RestaurantInfo,
        customer: CustomerDetails,
    ) -> BookingRecord {
        self.bookings.create_booking(info, customer).await
    }

    pub async fn fetch_booking_details(&self, id: &str) -> Option<BookingRecord> {
        self.bookings.fetch_booking_details(id).await
    }

    pub async fn fetch_all_bookings(&self, limit: usize) -> Vec<BookingRecord> {
        self.bookings.fetch_all_bookings(limit).await
    }
}
