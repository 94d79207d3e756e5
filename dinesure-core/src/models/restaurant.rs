use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::SchemaError;
use crate::remote::{Document, Fields};

/// Booking state of a single table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableStatus {
    Available,
    Booked,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Available => write!(f, "Available"),
            TableStatus::Booked => write!(f, "Booked"),
        }
    }
}

impl FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(TableStatus::Available),
            "booked" => Ok(TableStatus::Booked),
            _ => Err(format!(
                "Invalid table status '{}'. Valid options: Available, Booked",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantTable {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    pub status: TableStatus,
    /// Keys this client does not interpret, carried through unchanged.
    #[serde(flatten)]
    pub extra: Fields,
}

impl RestaurantTable {
    pub fn new(number: u32, status: TableStatus) -> Self {
        Self {
            number,
            capacity: None,
            status,
            extra: Fields::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == TableStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub is_veg: bool,
    pub tables: Vec<RestaurantTable>,
}

impl Restaurant {
    /// Decodes a remote document, rejecting anything that does not have the
    /// restaurant shape. The document id always wins over an `id` field.
    pub fn from_document(doc: &Document) -> Result<Self, SchemaError> {
        let mut fields = doc.fields.clone();
        fields.insert("id".to_string(), serde_json::Value::String(doc.id.clone()));

        let restaurant: Restaurant = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| SchemaError::Malformed {
                id: doc.id.clone(),
                kind: "restaurant",
                reason: e.to_string(),
            })?;
        restaurant.validate()?;
        Ok(restaurant)
    }

    /// Checks the invariants serde cannot express: table numbers are
    /// positive and unique within the restaurant.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if table.number == 0 {
                return Err(SchemaError::Invalid {
                    id: self.id.clone(),
                    reason: "table number must be positive".to_string(),
                });
            }
            if !seen.insert(table.number) {
                return Err(SchemaError::Invalid {
                    id: self.id.clone(),
                    reason: format!("duplicate table number {}", table.number),
                });
            }
        }
        Ok(())
    }

    pub fn table(&self, number: u32) -> Option<&RestaurantTable> {
        self.tables.iter().find(|t| t.number == number)
    }

    pub fn available_tables(&self) -> impl Iterator<Item = &RestaurantTable> {
        self.tables.iter().filter(|t| t.is_available())
    }

    /// Returns a copy of the table sequence with one table's status replaced.
    /// Tables with other numbers are left untouched.
    pub fn tables_with_status(&self, number: u32, status: TableStatus) -> Vec<RestaurantTable> {
        self.tables
            .iter()
            .map(|table| {
                if table.number == number {
                    RestaurantTable {
                        status,
                        ..table.clone()
                    }
                } else {
                    table.clone()
                }
            })
            .collect()
    }
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_veg { "Veg" } else { "Non-Veg" };
        writeln!(f, "{} ({}, {})", self.name, self.cuisine, kind)?;
        for table in &self.tables {
            write!(f, "  Table {}: {}", table.number, table.status)?;
            if let Some(capacity) = &table.capacity {
                write!(f, " (seats {})", capacity)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Tri-state selector for restaurant listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VegFilter {
    #[default]
    All,
    VegOnly,
    NonVegOnly,
}

impl VegFilter {
    /// The `isVeg` value to match, or `None` when unfiltered.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            VegFilter::All => None,
            VegFilter::VegOnly => Some(true),
            VegFilter::NonVegOnly => Some(false),
        }
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        match self.as_flag() {
            Some(veg) => restaurant.is_veg == veg,
            None => true,
        }
    }

    pub fn apply(&self, restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
        restaurants.into_iter().filter(|r| self.matches(r)).collect()
    }
}

impl From<Option<bool>> for VegFilter {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => VegFilter::All,
            Some(true) => VegFilter::VegOnly,
            Some(false) => VegFilter::NonVegOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(id: &str, fields: serde_json::Value) -> Document {
        Document {
            id: id.to_string(),
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    fn sample() -> Restaurant {
        Restaurant {
            id: "r1".to_string(),
            name: "Spice Garden".to_string(),
            cuisine: "Indian".to_string(),
            is_veg: true,
            tables: vec![
                RestaurantTable::new(1, TableStatus::Available),
                RestaurantTable::new(2, TableStatus::Booked),
                RestaurantTable::new(3, TableStatus::Available),
            ],
        }
    }

    #[test]
    fn test_table_status_json() {
        assert_eq!(
            serde_json::to_string(&TableStatus::Available).unwrap(),
            "\"Available\""
        );
        assert_eq!(
            serde_json::from_str::<TableStatus>("\"Booked\"").unwrap(),
            TableStatus::Booked
        );
    }

    #[test]
    fn test_table_status_from_str() {
        assert_eq!(TableStatus::from_str("booked").unwrap(), TableStatus::Booked);
        assert!(TableStatus::from_str("reserved").is_err());
    }

    #[test]
    fn test_restaurant_uses_camel_case_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["isVeg"], json!(true));
        assert!(value.get("is_veg").is_none());
        assert!(value["tables"][0].get("capacity").is_none());
    }

    #[test]
    fn test_from_document_takes_document_id() {
        let doc = document(
            "abc123",
            json!({
                "id": "stale",
                "name": "Ocean's Catch",
                "cuisine": "Seafood",
                "isVeg": false,
                "tables": [{"number": 1, "capacity": "4", "status": "Available"}]
            }),
        );

        let restaurant = Restaurant::from_document(&doc).unwrap();
        assert_eq!(restaurant.id, "abc123");
        assert_eq!(restaurant.tables[0].capacity.as_deref(), Some("4"));
    }

    #[test]
    fn test_from_document_rejects_missing_fields() {
        let doc = document("x", json!({"name": "No Tables", "cuisine": "Thai"}));
        let err = Restaurant::from_document(&doc).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_from_document_rejects_bad_status() {
        let doc = document(
            "x",
            json!({
                "name": "Odd",
                "cuisine": "Thai",
                "isVeg": true,
                "tables": [{"number": 1, "status": "Reserved"}]
            }),
        );
        assert!(Restaurant::from_document(&doc).is_err());
    }

    #[test]
    fn test_from_document_rejects_duplicate_tables() {
        let doc = document(
            "x",
            json!({
                "name": "Twice",
                "cuisine": "Thai",
                "isVeg": true,
                "tables": [
                    {"number": 2, "status": "Available"},
                    {"number": 2, "status": "Booked"}
                ]
            }),
        );
        let err = Restaurant::from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("duplicate table number 2"));
    }

    #[test]
    fn test_from_document_rejects_table_zero() {
        let doc = document(
            "x",
            json!({
                "name": "Zero",
                "cuisine": "Thai",
                "isVeg": false,
                "tables": [{"number": 0, "status": "Available"}]
            }),
        );
        assert!(matches!(
            Restaurant::from_document(&doc),
            Err(SchemaError::Invalid { .. })
        ));
    }

    #[test]
    fn test_tables_with_status_only_touches_target() {
        let restaurant = sample();
        let tables = restaurant.tables_with_status(3, TableStatus::Booked);

        assert_eq!(tables[0], restaurant.tables[0]);
        assert_eq!(tables[1], restaurant.tables[1]);
        assert_eq!(tables[2].status, TableStatus::Booked);
    }

    #[test]
    fn test_unknown_table_keys_survive_status_change() {
        let doc = document(
            "r9",
            json!({
                "name": "Spice Garden",
                "cuisine": "Indian",
                "isVeg": true,
                "tables": [
                    {"number": 1, "status": "Available", "seats": 4, "location": "window"},
                    {"number": 2, "status": "Available", "seats": 2}
                ]
            }),
        );
        let restaurant = Restaurant::from_document(&doc).unwrap();

        let tables =
            serde_json::to_value(restaurant.tables_with_status(2, TableStatus::Booked)).unwrap();
        assert_eq!(
            tables,
            json!([
                {"number": 1, "status": "Available", "seats": 4, "location": "window"},
                {"number": 2, "status": "Booked", "seats": 2}
            ])
        );
    }

    #[test]
    fn test_tables_with_status_unknown_number_is_noop() {
        let restaurant = sample();
        assert_eq!(
            restaurant.tables_with_status(9, TableStatus::Booked),
            restaurant.tables
        );
    }

    #[test]
    fn test_available_tables() {
        let numbers: Vec<u32> = sample().available_tables().map(|t| t.number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_veg_filter_from_option() {
        assert_eq!(VegFilter::from(None), VegFilter::All);
        assert_eq!(VegFilter::from(Some(true)), VegFilter::VegOnly);
        assert_eq!(VegFilter::from(Some(false)), VegFilter::NonVegOnly);
    }

    #[test]
    fn test_veg_filter_apply() {
        let veg = sample();
        let mut meat = sample();
        meat.name = "Carnivore's Grill".to_string();
        meat.is_veg = false;

        let all = VegFilter::All.apply(vec![veg.clone(), meat.clone()]);
        assert_eq!(all.len(), 2);

        let only_veg = VegFilter::VegOnly.apply(vec![veg.clone(), meat.clone()]);
        assert_eq!(only_veg, vec![veg]);

        let only_meat = VegFilter::NonVegOnly.apply(vec![sample(), meat.clone()]);
        assert_eq!(only_meat, vec![meat]);
    }

    #[test]
    fn test_display_lists_tables() {
        let text = sample().to_string();
        assert!(text.starts_with("Spice Garden (Indian, Veg)"));
        assert!(text.contains("Table 2: Booked"));
    }
}
