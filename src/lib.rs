pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::DiscoveryConfig;
pub use self::core::{
    coordinator::{DiscoveryCoordinator, DiscoveryPorts, DiscoverySettings},
    markers::MarkerFactory,
};
pub use domain::events::{DiscoveryEvent, DiscoveryHandle, DiscoveryInbox};
pub use utils::error::{DiscoveryError, Result};
