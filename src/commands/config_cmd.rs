use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("offline: {}", config.offline.value);
                        println!("  source: {}", config.offline.source);
                        println!();

                        let remote = &config.remote;
                        println!(
                            "remote.url: {}",
                            remote.url.as_deref().unwrap_or("(not set)")
                        );
                        println!(
                            "remote.api_key: {}",
                            if remote.api_key.is_some() {
                                "(set)"
                            } else {
                                "(not set)"
                            }
                        );
                        println!(
                            "remote.restaurants_collection: {}",
                            remote.restaurants_collection
                        );
                        println!("remote.bookings_collection: {}", remote.bookings_collection);
                        println!("remote.timeout_secs: {}", remote.timeout_secs);
                    }
                }
                Ok(())
            }
        }
    }
}
