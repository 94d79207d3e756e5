use clap::{Args, Subcommand};

use dinesure_core::{BookingRecord, DataAccess, DEFAULT_BOOKINGS_LIMIT, DISPLAY_DATE_FORMAT};

use super::OutputFormat;

#[derive(Args)]
pub struct BookingsCommand {
    #[command(subcommand)]
    pub command: BookingsSubcommand,
}

#[derive(Subcommand)]
pub enum BookingsSubcommand {
    /// List recent bookings, newest first
    List {
        /// Maximum number of bookings to show
        #[arg(long, short, default_value_t = DEFAULT_BOOKINGS_LIMIT)]
        limit: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show booking details
    Show {
        /// Booking ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl BookingsCommand {
    pub async fn run(&self, data: &DataAccess) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            BookingsSubcommand::List { limit, format } => {
                let bookings = data.fetch_all_bookings(*limit).await;

                if bookings.is_empty() {
                    println!("No bookings found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&bookings)?);
                    }
                    OutputFormat::Text => {
                        for booking in &bookings {
                            println!("{}", summary_line(booking));
                        }
                        println!("\nTotal: {} booking(s)", bookings.len());
                    }
                }
                Ok(())
            }

            BookingsSubcommand::Show { id, format } => {
                let booking = data
                    .fetch_booking_details(id)
                    .await
                    .ok_or_else(|| format!("Booking not found: {}", id))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&booking)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", booking);
                    }
                }
                Ok(())
            }
        }
    }
}

fn summary_line(booking: &BookingRecord) -> String {
    format!(
        "{}  {}  {} table {} at {} for {} ({})",
        booking.created_at.format(DISPLAY_DATE_FORMAT),
        booking.id,
        booking.restaurant_name,
        booking.table_number,
        booking.time,
        booking.customer_name,
        booking.status
    )
}
