use clap::Args;

use dinesure_core::{
    CustomerDetails, DataAccess, Restaurant, RestaurantInfo, TableStatus, VegFilter,
};

use crate::menu;

#[derive(Args)]
pub struct BookCommand {
    /// Restaurant name
    pub restaurant: String,

    /// Table number
    #[arg(long, short)]
    pub table: u32,

    /// Time slot (HH:MM, 11:00 to 22:30 in 30 minute steps)
    #[arg(long)]
    pub time: String,

    /// Party size (1-6)
    #[arg(long, default_value = "2")]
    pub capacity: u32,

    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Phone number or email
    #[arg(long)]
    pub contact: String,

    /// Starter (soup, salad, appetizer)
    #[arg(long)]
    pub starter: String,

    /// Main course (depends on whether the restaurant is vegetarian)
    #[arg(long = "main")]
    pub main_course: String,

    /// Dessert (ice-cream, cake, pudding)
    #[arg(long)]
    pub dessert: String,

    /// Special instructions for the kitchen
    #[arg(long)]
    pub instructions: Option<String>,
}

impl BookCommand {
    pub async fn run(&self, data: &DataAccess) -> Result<(), Box<dyn std::error::Error>> {
        let restaurants = data.fetch_restaurants(VegFilter::All).await;
        let (info, customer) = self.build_request(&restaurants)?;

        let record = data.create_booking(info, customer).await;
        println!("Booking confirmed:");
        println!("{}", record);
        Ok(())
    }

    /// Validates the form against the current restaurant list.
    pub fn build_request(
        &self,
        restaurants: &[Restaurant],
    ) -> Result<(RestaurantInfo, CustomerDetails), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Customer name is required".to_string());
        }
        let contact = self.contact.trim();
        if contact.is_empty() {
            return Err("Contact details are required".to_string());
        }

        let restaurant = restaurants
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(self.restaurant.trim()))
            .ok_or_else(|| format!("Restaurant not found: {}", self.restaurant))?;

        let table = restaurant
            .table(self.table)
            .ok_or_else(|| format!("{} has no table {}", restaurant.name, self.table))?;
        if table.status == TableStatus::Booked {
            let free: Vec<String> = restaurant
                .available_tables()
                .map(|t| t.number.to_string())
                .collect();
            let hint = if free.is_empty() {
                "no tables are free".to_string()
            } else {
                format!("free tables: {}", free.join(", "))
            };
            return Err(format!(
                "Table {} at {} is already booked ({})",
                self.table, restaurant.name, hint
            ));
        }

        let time = menu::parse_time_slot(&self.time)?;
        menu::check_party_size(self.capacity)?;
        menu::check_choice("starter", &self.starter, &menu::STARTERS)?;
        menu::check_choice(
            "main course",
            &self.main_course,
            menu::mains(restaurant.is_veg),
        )?;
        menu::check_choice("dessert", &self.dessert, &menu::DESSERTS)?;

        let info = RestaurantInfo {
            restaurant_name: restaurant.name.clone(),
            table_number: table.number,
            time,
            capacity: self.capacity.to_string(),
            is_veg: restaurant.is_veg,
        };
        let customer = CustomerDetails {
            customer_name: name.to_string(),
            contact_details: contact.to_string(),
            starter: self.starter.clone(),
            main_course: self.main_course.clone(),
            dessert: self.dessert.clone(),
            special_instructions: self
                .instructions
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        Ok((info, customer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinesure_core::RestaurantTable;

    fn restaurants() -> Vec<Restaurant> {
        vec![
            Restaurant {
                id: "2".to_string(),
                name: "Spice Garden".to_string(),
                cuisine: "Indian".to_string(),
                is_veg: true,
                tables: vec![
                    RestaurantTable::new(1, TableStatus::Booked),
                    RestaurantTable::new(2, TableStatus::Available),
                    RestaurantTable::new(3, TableStatus::Available),
                ],
            },
            Restaurant {
                id: "7".to_string(),
                name: "Carnivore's Grill".to_string(),
                cuisine: "BBQ".to_string(),
                is_veg: false,
                tables: vec![RestaurantTable::new(1, TableStatus::Available)],
            },
        ]
    }

    fn command() -> BookCommand {
        BookCommand {
            restaurant: "spice garden".to_string(),
            table: 3,
            time: "18:30".to_string(),
            capacity: 2,
            name: " Asha Rao ".to_string(),
            contact: "asha@example.com".to_string(),
            starter: "soup".to_string(),
            main_course: "paneer-tikka".to_string(),
            dessert: "cake".to_string(),
            instructions: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_valid_request() {
        let (info, customer) = command().build_request(&restaurants()).unwrap();
        assert_eq!(info.restaurant_name, "Spice Garden");
        assert_eq!(info.table_number, 3);
        assert_eq!(info.capacity, "2");
        assert!(info.is_veg);
        assert_eq!(customer.customer_name, "Asha Rao");
        assert_eq!(customer.special_instructions, None);
    }

    #[test]
    fn test_booked_table_is_rejected() {
        let mut cmd = command();
        cmd.table = 1;
        let err = cmd.build_request(&restaurants()).unwrap_err();
        assert!(err.contains("already booked"));
        assert!(err.contains("free tables: 2, 3"));
    }

    #[test]
    fn test_unknown_restaurant_and_table() {
        let mut cmd = command();
        cmd.restaurant = "Nowhere".to_string();
        assert!(cmd.build_request(&restaurants()).is_err());

        let mut cmd = command();
        cmd.table = 9;
        let err = cmd.build_request(&restaurants()).unwrap_err();
        assert_eq!(err, "Spice Garden has no table 9");
    }

    #[test]
    fn test_main_course_must_match_restaurant_type() {
        let mut cmd = command();
        cmd.main_course = "beef-steak".to_string();
        assert!(cmd.build_request(&restaurants()).is_err());

        cmd.restaurant = "Carnivore's Grill".to_string();
        cmd.table = 1;
        let (info, _) = cmd.build_request(&restaurants()).unwrap();
        assert!(!info.is_veg);
    }

    #[test]
    fn test_required_fields_and_limits() {
        let mut cmd = command();
        cmd.name = "   ".to_string();
        assert_eq!(
            cmd.build_request(&restaurants()).unwrap_err(),
            "Customer name is required"
        );

        let mut cmd = command();
        cmd.capacity = 7;
        assert!(cmd.build_request(&restaurants()).is_err());

        let mut cmd = command();
        cmd.time = "18:45".to_string();
        assert!(cmd.build_request(&restaurants()).is_err());

        let mut cmd = command();
        cmd.dessert = "pie".to_string();
        assert!(cmd.build_request(&restaurants()).is_err());
    }
}
