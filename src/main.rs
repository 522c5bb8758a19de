use anyhow::Context;
use clap::Parser;
use feedme_discovery::adapters::{
    ConsoleAddressDisplay, ConsoleFilterUi, ConsoleMapSurface, FixedLocationWatcher,
    GoogleGeocoder, GooglePlacesProvider, TracingObserver,
};
use feedme_discovery::domain::model::{AuthorizationStatus, CategorySet, Coordinate};
use feedme_discovery::utils::error::ErrorSeverity;
use feedme_discovery::utils::{logger, validation::Validate};
use feedme_discovery::{
    CliConfig, DiscoveryConfig, DiscoveryCoordinator, DiscoveryHandle, DiscoveryPorts,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    let config = match DiscoveryConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.monitoring.json_logs {
        logger::init_json_logger(&config.monitoring.log_level);
    } else {
        logger::init_cli_logger(args.verbose, &config.monitoring.log_level);
    }

    tracing::info!("🚀 Starting feedme");
    tracing::debug!("CLI args: {:?}", args);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        let exit_code = if e.severity() >= ErrorSeverity::High { 1 } else { 2 };
        std::process::exit(exit_code);
    }

    let mut settings = config.settings();
    if !args.categories.is_empty() {
        settings.default_categories = CategorySet::new(args.categories.iter().cloned());
        tracing::info!("🔧 Categories overridden from command line");
    }

    let location = Coordinate::new(args.lat, args.lon);
    display_summary(&config, &settings.default_categories, location);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No service will be called");
        return Ok(());
    }

    let api_key = config.api_key()?.to_string();
    let places = GooglePlacesProvider::new(
        config.google.places_endpoint.clone(),
        api_key.clone(),
        config.google.timeout_seconds,
    )
    .context("creating Places client")?;
    let geocoder = GoogleGeocoder::new(
        config.google.geocode_endpoint.clone(),
        api_key,
        config.google.timeout_seconds,
    )
    .context("creating Geocoding client")?;

    // 協調器與所有事件來源共用同一個佇列
    let (handle, mut inbox) = DiscoveryHandle::channel();
    let ports = DiscoveryPorts {
        geolocation: Box::new(FixedLocationWatcher::new(
            AuthorizationStatus::NotDetermined,
            !args.deny_location,
            Some(location),
        )),
        places: Arc::new(places),
        geocoder: Arc::new(geocoder),
        map: Box::new(ConsoleMapSurface::new(handle.clone(), location)),
        address: Box::new(ConsoleAddressDisplay),
        filter_ui: Box::new(ConsoleFilterUi),
        observer: Arc::new(TracingObserver),
    };

    let mut coordinator =
        DiscoveryCoordinator::new(ports, settings, config.marker_factory(), handle);
    coordinator.open_filter_selection();
    coordinator.start();
    coordinator.run_until_idle(&mut inbox).await;

    match coordinator.displayed_address() {
        Some(address) => println!("✅ Done. Map centered on: {}", address.replace('\n', ", ")),
        None => println!("✅ Done. No address available for {}", location),
    }

    Ok(())
}

fn display_summary(config: &DiscoveryConfig, categories: &CategorySet, location: Coordinate) {
    tracing::info!("📋 Discovery summary:");
    tracing::info!("   Location: {}", location);
    tracing::info!("   Radius: {}m", config.search.radius_meters);
    tracing::info!("   Zoom: {}", config.map.default_zoom);
    tracing::info!("   Categories: {}", categories.to_sorted_vec().join(", "));
    tracing::info!("   Places endpoint: {}", config.google.places_endpoint);
    tracing::info!("   Geocode endpoint: {}", config.google.geocode_endpoint);
}
