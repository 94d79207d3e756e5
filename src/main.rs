use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod menu;

use commands::{open_data_access, BookCommand, BookingsCommand, ConfigCommand, RestaurantsCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "dinesure")]
#[command(version)]
#[command(about = "Book restaurant tables, online or off", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List restaurants and their tables
    Restaurants(RestaurantsCommand),

    /// Book a table with a food pre-order
    Book(BookCommand),

    /// View bookings
    Bookings(BookingsCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dinesure=warn,dinesure_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Restaurants(cmd)) => {
            let data = open_data_access(&config)?;
            cmd.run(&data).await?;
        }
        Some(Commands::Book(cmd)) => {
            let data = open_data_access(&config)?;
            cmd.run(&data).await?;
        }
        Some(Commands::Bookings(cmd)) => {
            let data = open_data_access(&config)?;
            cmd.run(&data).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
