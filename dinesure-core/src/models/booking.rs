use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{timestamp, SchemaError};
use crate::remote::{Document, Fields};

/// How booking timestamps are shown to people, e.g. "May 1, 2024, 06:05 PM".
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!(
                "Invalid booking status '{}'. Valid options: confirmed, cancelled",
                s
            )),
        }
    }
}

/// The table/time selection half of a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInfo {
    pub restaurant_name: String,
    pub table_number: u32,
    pub time: String,
    pub capacity: String,
    pub is_veg: bool,
}

/// The customer and pre-order half of a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub customer_name: String,
    pub contact_details: String,
    pub starter: String,
    pub main_course: String,
    pub dessert: String,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    pub restaurant_name: String,
    pub table_number: u32,
    pub time: String,
    pub capacity: String,
    pub is_veg: bool,
    pub customer_name: String,
    pub contact_details: String,
    pub starter: String,
    pub main_course: String,
    pub dessert: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub status: BookingStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Assembles a confirmed booking that has not been assigned an id yet.
    pub fn new(info: RestaurantInfo, customer: CustomerDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            restaurant_name: info.restaurant_name,
            table_number: info.table_number,
            time: info.time,
            capacity: info.capacity,
            is_veg: info.is_veg,
            customer_name: customer.customer_name,
            contact_details: customer.contact_details,
            starter: customer.starter,
            main_course: customer.main_course,
            dessert: customer.dessert,
            special_instructions: customer.special_instructions,
            status: BookingStatus::Confirmed,
            created_at,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Document fields for the remote store. The id is the document key,
    /// never a field.
    pub fn to_fields(&self) -> Fields {
        let mut fields = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Fields::new(),
        };
        fields.remove("id");
        fields
    }

    pub fn from_document(doc: &Document) -> Result<Self, SchemaError> {
        let mut fields = doc.fields.clone();
        fields.insert("id".to_string(), serde_json::Value::String(doc.id.clone()));

        let record: BookingRecord = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| SchemaError::Malformed {
                id: doc.id.clone(),
                kind: "booking",
                reason: e.to_string(),
            })?;

        if record.table_number == 0 {
            return Err(SchemaError::Invalid {
                id: doc.id.clone(),
                reason: "table number must be positive".to_string(),
            });
        }
        Ok(record)
    }
}

impl fmt::Display for BookingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Booking {}", self.id)?;
        writeln!(f, "  Restaurant: {}", self.restaurant_name)?;
        writeln!(f, "  Table:      {}", self.table_number)?;
        writeln!(f, "  Time:       {}", self.time)?;
        writeln!(f, "  Party:      {}", self.capacity)?;
        writeln!(f, "  Customer:   {} ({})", self.customer_name, self.contact_details)?;
        writeln!(
            f,
            "  Pre-order:  {} / {} / {}",
            self.starter, self.main_course, self.dessert
        )?;
        if let Some(notes) = &self.special_instructions {
            writeln!(f, "  Notes:      {}", notes)?;
        }
        writeln!(f, "  Status:     {}", self.status)?;
        write!(
            f,
            "  Booked at:  {}",
            self.created_at.format(DISPLAY_DATE_FORMAT)
        )
    }
}
