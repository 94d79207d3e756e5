use clap::Args;

use dinesure_core::{DataAccess, VegFilter};

use super::OutputFormat;

#[derive(Args)]
pub struct RestaurantsCommand {
    /// Only vegetarian restaurants
    #[arg(long, conflicts_with = "non_veg")]
    pub veg: bool,

    /// Only non-vegetarian restaurants
    #[arg(long)]
    pub non_veg: bool,

    /// Only list tables that can still be booked
    #[arg(long)]
    pub available: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RestaurantsCommand {
    pub fn filter(&self) -> VegFilter {
        match (self.veg, self.non_veg) {
            (true, _) => VegFilter::VegOnly,
            (_, true) => VegFilter::NonVegOnly,
            _ => VegFilter::All,
        }
    }

    pub async fn run(&self, data: &DataAccess) -> Result<(), Box<dyn std::error::Error>> {
        let mut restaurants = data.fetch_restaurants(self.filter()).await;

        if self.available {
            for restaurant in &mut restaurants {
                restaurant.tables.retain(|t| t.is_available());
            }
        }

        if restaurants.is_empty() {
            println!("No restaurants found");
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&restaurants)?);
            }
            OutputFormat::Text => {
                for (i, restaurant) in restaurants.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    print!("{}", restaurant);
                }
                println!("\nTotal: {} restaurant(s)", restaurants.len());
            }
        }
        Ok(())
    }
}
