mod booking;
mod restaurant;

#[cfg(test)]
pub(crate) use booking::fixtures;
pub use booking::{
    BookingRecord, BookingStatus, CustomerDetails, RestaurantInfo, DISPLAY_DATE_FORMAT,
};
pub use restaurant::{Restaurant, RestaurantTable, TableStatus, VegFilter};

use thiserror::Error;

/// A remote document that does not have the shape of the record it claims
/// to be.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Malformed {kind} document {id}: {reason}")]
    Malformed {
        id: String,
        kind: &'static str,
        reason: String,
    },

    #[error("Invalid document {id}: {reason}")]
    Invalid { id: String, reason: String },
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix, so the
/// string order matches the chronological order.
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
