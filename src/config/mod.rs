pub mod toml_config;

pub use toml_config::DiscoveryConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "feedme")]
#[command(about = "Find places to eat and drink around a location")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "feedme.toml")]
    pub config: String,

    /// Latitude of the simulated device location
    #[arg(long, allow_hyphen_values = true, default_value = "37.33")]
    pub lat: f64,

    /// Longitude of the simulated device location
    #[arg(long, allow_hyphen_values = true, default_value = "-122.03")]
    pub lon: f64,

    /// Override the default category filter (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Simulate a user who has not granted location access
    #[arg(long)]
    pub deny_location: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Dry run - show the effective settings without calling any service
    #[arg(long)]
    pub dry_run: bool,
}
