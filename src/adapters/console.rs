use crate::domain::events::DiscoveryHandle;
use crate::domain::model::{CategorySet, Coordinate, Marker};
use crate::domain::ports::{AddressDisplay, DiscoveryObserver, FilterSelectionUi, MapSurface};
use crate::utils::error::DiscoveryError;

/// 在終端機上「繪製」地圖。每次移動鏡頭後都會回報一次 viewport 靜止事件。
pub struct ConsoleMapSurface {
    handle: DiscoveryHandle,
    center: Coordinate,
    markers: Vec<Marker>,
}

impl ConsoleMapSurface {
    pub fn new(handle: DiscoveryHandle, initial_center: Coordinate) -> Self {
        Self {
            handle,
            center: initial_center,
            markers: Vec::new(),
        }
    }
}

impl MapSurface for ConsoleMapSurface {
    fn clear_markers(&mut self) {
        if !self.markers.is_empty() {
            tracing::debug!("Clearing {} marker(s)", self.markers.len());
        }
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        println!(
            "📌 {:<32} {:<14} {}  {}",
            marker.title, marker.style.icon, marker.position, marker.snippet
        );
        self.markers.push(marker);
    }

    fn set_camera(&mut self, target: Coordinate, zoom: f32) {
        tracing::info!("🗺️ Camera moved to {} (zoom {})", target, zoom);
        self.center = target;
        self.handle.viewport_settled(target);
    }

    fn enable_live_location_indicator(&mut self, enabled: bool) {
        tracing::debug!("Live location indicator: {}", enabled);
    }

    fn current_viewport_center(&self) -> Coordinate {
        self.center
    }
}

#[derive(Debug, Default)]
pub struct ConsoleAddressDisplay;

impl AddressDisplay for ConsoleAddressDisplay {
    fn show_address(&mut self, text: &str) {
        println!("🏠 {}", text.replace('\n', " / "));
    }
}

#[derive(Debug, Default)]
pub struct ConsoleFilterUi;

impl FilterSelectionUi for ConsoleFilterUi {
    fn present(&mut self, preselected: &CategorySet) {
        println!("🔧 Categories: {}", preselected.to_sorted_vec().join(", "));
    }

    fn dismiss(&mut self) {
        tracing::debug!("Filter selection dismissed");
    }
}

/// 把回報的錯誤寫進日誌，不做其他處理
#[derive(Debug, Default)]
pub struct TracingObserver;

impl DiscoveryObserver for TracingObserver {
    fn report(&self, error: &DiscoveryError) {
        tracing::warn!(
            category = ?error.category(),
            severity = ?error.severity(),
            "{}",
            error.user_friendly_message()
        );
        tracing::debug!("💡 Suggestion: {}", error.recovery_suggestion());
    }
}
