// Adapters layer: concrete implementations of the domain ports (Google APIs, console output, simulated device).

pub mod console;
pub mod google_geocoder;
pub mod google_places;
pub mod http;
pub mod simulated;

pub use console::{ConsoleAddressDisplay, ConsoleFilterUi, ConsoleMapSurface, TracingObserver};
pub use google_geocoder::GoogleGeocoder;
pub use google_places::GooglePlacesProvider;
pub use simulated::FixedLocationWatcher;
