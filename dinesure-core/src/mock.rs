//! Seed data for a first-run client with no remote and no local data.

use rand::Rng;

use crate::cache::{LocalCacheStore, RESTAURANTS_KEY};
use crate::models::{Restaurant, RestaurantTable, TableStatus, VegFilter};

/// (id, name, cuisine, is_veg, table count)
const MOCK_RESTAURANTS: [(&str, &str, &str, bool, u32); 8] = [
    ("1", "The Fine Diner", "Continental", false, 5),
    ("2", "Spice Garden", "Indian", true, 4),
    ("3", "Sushi Express", "Japanese", false, 6),
    ("4", "Green Delight", "Vegetarian", true, 3),
    ("5", "Veggie Haven", "Vegan", true, 4),
    ("6", "Herbivore's Feast", "Vegetarian", true, 2),
    ("7", "Carnivore's Grill", "BBQ", false, 5),
    ("8", "Ocean's Catch", "Seafood", false, 3),
];

/// Generates the eight seed restaurants with random table statuses, writes
/// the full unfiltered set to the cache and returns the filtered view.
pub fn generate_mock_restaurants(cache: &LocalCacheStore, filter: VegFilter) -> Vec<Restaurant> {
    generate_mock_restaurants_with(&mut rand::rng(), cache, filter)
}

pub fn generate_mock_restaurants_with<R: Rng + ?Sized>(
    rng: &mut R,
    cache: &LocalCacheStore,
    filter: VegFilter,
) -> Vec<Restaurant> {
    let restaurants: Vec<Restaurant> = MOCK_RESTAURANTS
        .iter()
        .map(|(id, name, cuisine, is_veg, table_count)| Restaurant {
            id: id.to_string(),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            is_veg: *is_veg,
            tables: generate_tables(rng, *table_count),
        })
        .collect();

    cache.store(RESTAURANTS_KEY, &restaurants);
    tracing::debug!("Seeded local cache with {} mock restaurants", restaurants.len());

    filter.apply(restaurants)
}

fn generate_tables<R: Rng + ?Sized>(rng: &mut R, count: u32) -> Vec<RestaurantTable> {
    (1..=count)
        .map(|number| {
            let status = if rng.random_bool(0.5) {
                TableStatus::Available
            } else {
                TableStatus::Booked
            };
            RestaurantTable::new(number, status)
        })
        .collect()
}
