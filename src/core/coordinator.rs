use crate::core::markers::MarkerFactory;
use crate::domain::events::{DiscoveryEvent, DiscoveryHandle, DiscoveryInbox};
use crate::domain::model::{AddressLines, AuthorizationStatus, CategorySet, Coordinate, Place};
use crate::domain::ports::{
    AddressDisplay, DiscoveryObserver, FilterSelectionUi, GeolocationWatcher, MapSurface,
    PlacesDataProvider, ReverseGeocoder,
};
use crate::utils::error::{DiscoveryError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;

pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 1000.0;
pub const DEFAULT_ZOOM: f32 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySettings {
    pub search_radius_meters: f64,
    pub default_zoom: f32,
    pub default_categories: CategorySet,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            default_zoom: DEFAULT_ZOOM,
            default_categories: CategorySet::defaults(),
        }
    }
}

/// 協調器使用的所有外部協作者
pub struct DiscoveryPorts {
    pub geolocation: Box<dyn GeolocationWatcher>,
    pub places: Arc<dyn PlacesDataProvider>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub map: Box<dyn MapSurface>,
    pub address: Box<dyn AddressDisplay>,
    pub filter_ui: Box<dyn FilterSelectionUi>,
    pub observer: Arc<dyn DiscoveryObserver>,
}

/// 「地圖上顯示哪些地點」與「顯示哪個地址」的唯一決定者。
///
/// 所有事件（包含非同步呼叫的完成通知）都經過 [`DiscoveryCoordinator::dispatch`]
/// 依序處理，因此標記集合與地址文字只會在單一執行脈絡中被修改。
/// 每次查詢地點都會遞增 `generation`，回應抵達時若世代不符就整個丟棄。
pub struct DiscoveryCoordinator {
    ports: DiscoveryPorts,
    marker_factory: MarkerFactory,
    settings: DiscoverySettings,
    handle: DiscoveryHandle,
    categories: CategorySet,
    generation: u64,
    last_viewport: Option<Coordinate>,
    displayed_address: Option<String>,
    in_flight: usize,
    draining: bool,
}

impl DiscoveryCoordinator {
    pub fn new(
        ports: DiscoveryPorts,
        settings: DiscoverySettings,
        marker_factory: MarkerFactory,
        handle: DiscoveryHandle,
    ) -> Self {
        ports.geolocation.subscribe(handle.clone());

        Self {
            categories: settings.default_categories.clone(),
            ports,
            marker_factory,
            settings,
            handle,
            generation: 0,
            last_viewport: None,
            displayed_address: None,
            in_flight: 0,
            draining: false,
        }
    }

    pub fn handle(&self) -> DiscoveryHandle {
        self.handle.clone()
    }

    pub fn active_categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn displayed_address(&self) -> Option<&str> {
        self.displayed_address.as_deref()
    }

    pub fn last_viewport(&self) -> Option<Coordinate> {
        self.last_viewport
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// 啟動時依目前授權狀態決定要直接定位還是先請求授權
    pub fn start(&mut self) {
        let status = self.ports.geolocation.authorization_status();
        tracing::info!("🚀 Starting discovery (authorization: {})", status);

        match status {
            AuthorizationStatus::NotDetermined => self.ports.geolocation.request_authorization(),
            other => self.on_authorization_changed(other),
        }
    }

    /// 事件迴圈：處理到收到 `Shutdown` 且所有進行中的呼叫都回來為止
    pub async fn run(&mut self, inbox: &mut DiscoveryInbox) {
        if self.draining && self.in_flight == 0 {
            return;
        }

        while let Some(event) = inbox.recv().await {
            self.dispatch(event);

            if self.draining && self.in_flight == 0 {
                tracing::info!("🛑 Discovery coordinator drained, stopping");
                break;
            }
        }
    }

    /// 處理佇列中的事件直到佇列清空且沒有進行中的呼叫
    pub async fn run_until_idle(&mut self, inbox: &mut DiscoveryInbox) {
        loop {
            match inbox.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(TryRecvError::Empty) if self.in_flight > 0 => match inbox.recv().await {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                Err(_) => break,
            }
        }
    }

    pub fn dispatch(&mut self, event: DiscoveryEvent) {
        tracing::trace!("Dispatching {} event", event.kind());

        match event {
            DiscoveryEvent::PlacesLoaded { generation, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.on_places_loaded(generation, result);
            }
            DiscoveryEvent::AddressResolved { coordinate, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.on_address_resolved(coordinate, result);
            }
            DiscoveryEvent::Shutdown => {
                tracing::debug!("Shutdown requested with {} call(s) in flight", self.in_flight);
                self.draining = true;
            }
            other if self.draining => {
                tracing::debug!("Ignoring {} event while draining", other.kind());
            }
            DiscoveryEvent::AuthorizationChanged(status) => self.on_authorization_changed(status),
            DiscoveryEvent::LocationUpdated {
                coordinate,
                timestamp,
            } => self.on_location_update(coordinate, timestamp),
            DiscoveryEvent::LocationFailed(description) => self.on_location_error(&description),
            DiscoveryEvent::ViewportSettled(coordinate) => self.on_viewport_settled(coordinate),
            DiscoveryEvent::ManualRefresh => self.on_manual_refresh(),
            DiscoveryEvent::OpenFilterSelection => self.open_filter_selection(),
            DiscoveryEvent::FilterCommitted(categories) => {
                self.on_filter_selection_committed(categories)
            }
        }
    }

    pub fn on_authorization_changed(&mut self, status: AuthorizationStatus) {
        match status {
            AuthorizationStatus::Authorized => {
                tracing::info!("📍 Location authorized, requesting current location");
                self.ports.geolocation.request_location();
                self.ports.map.enable_live_location_indicator(true);
            }
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => {
                self.report(DiscoveryError::PermissionDenied {
                    status: status.to_string(),
                });
            }
            AuthorizationStatus::NotDetermined => {
                tracing::debug!("Authorization not determined yet");
            }
        }
    }

    pub fn on_location_update(&mut self, coordinate: Option<Coordinate>, timestamp: DateTime<Utc>) {
        let Some(coordinate) = coordinate else {
            tracing::debug!("Location update without a fix, ignoring");
            return;
        };

        if !coordinate.is_valid() {
            self.report(DiscoveryError::location_unavailable(format!(
                "invalid fix {}",
                coordinate
            )));
            return;
        }

        tracing::info!(
            "📍 Location fix at {} (age {}s)",
            coordinate,
            (Utc::now() - timestamp).num_seconds().max(0)
        );

        self.fetch_places(coordinate);
        self.ports
            .map
            .set_camera(coordinate, self.settings.default_zoom);
        self.last_viewport = Some(coordinate);
    }

    pub fn on_location_error(&mut self, description: &str) {
        self.report(DiscoveryError::location_unavailable(description));
    }

    pub fn on_viewport_settled(&mut self, coordinate: Coordinate) {
        self.last_viewport = Some(coordinate);
        self.reverse_geocode(coordinate);
    }

    pub fn on_manual_refresh(&mut self) {
        let center = self.ports.map.current_viewport_center();
        tracing::debug!("Manual refresh at {}", center);
        self.fetch_places(center);
    }

    pub fn open_filter_selection(&mut self) {
        self.ports.filter_ui.present(&self.categories);
    }

    /// 先換上新的類別再查詢，讓查詢條件與標記樣式使用同一組類別
    pub fn on_filter_selection_committed(&mut self, categories: CategorySet) {
        tracing::info!(
            "🔧 Filter committed: [{}]",
            categories.iter().collect::<Vec<_>>().join(", ")
        );
        self.categories = categories;

        let center = self
            .last_viewport
            .unwrap_or_else(|| self.ports.map.current_viewport_center());
        self.fetch_places(center);

        self.ports.filter_ui.dismiss();
    }

    pub fn fetch_places(&mut self, near: Coordinate) {
        self.ports.map.clear_markers();
        self.generation += 1;
        let generation = self.generation;

        if self.categories.is_empty() {
            // 空類別會變成不篩選的查詢，寧可什麼都不顯示
            tracing::debug!("No categories selected, skipping place search #{}", generation);
            return;
        }

        tracing::debug!(
            "Searching places #{} near {} within {}m",
            generation,
            near,
            self.settings.search_radius_meters
        );

        let places = Arc::clone(&self.ports.places);
        let handle = self.handle.clone();
        let radius = self.settings.search_radius_meters;
        let categories = self.categories.clone();

        self.in_flight += 1;
        tokio::spawn(async move {
            // 內層任務 panic 時仍要送回完成通知，否則 in_flight 永遠不會歸零
            let search = tokio::spawn(async move {
                places.search(near, radius, &categories).await
            });
            let result = match search.await {
                Ok(Ok(places)) => Ok(places),
                Ok(Err(e @ DiscoveryError::SearchFailed { .. })) => Err(e),
                Ok(Err(other)) => Err(DiscoveryError::search_failed(other.to_string())),
                Err(join_error) => Err(DiscoveryError::search_failed(format!(
                    "search task aborted: {}",
                    join_error
                ))),
            };
            handle.send(DiscoveryEvent::PlacesLoaded { generation, result });
        });
    }

    fn reverse_geocode(&mut self, coordinate: Coordinate) {
        let geocoder = Arc::clone(&self.ports.geocoder);
        let handle = self.handle.clone();

        self.in_flight += 1;
        tokio::spawn(async move {
            let lookup = tokio::spawn(async move { geocoder.resolve(coordinate).await });
            let result = match lookup.await {
                Ok(Ok(lines)) => Ok(lines),
                Ok(Err(e @ DiscoveryError::GeocodeFailed { .. })) => Err(e),
                Ok(Err(other)) => Err(DiscoveryError::geocode_failed(other.to_string())),
                Err(join_error) => Err(DiscoveryError::geocode_failed(format!(
                    "geocode task aborted: {}",
                    join_error
                ))),
            };
            handle.send(DiscoveryEvent::AddressResolved { coordinate, result });
        });
    }

    fn on_places_loaded(&mut self, generation: u64, result: Result<Vec<Place>>) {
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale place search #{} (current #{})",
                generation,
                self.generation
            );
            return;
        }

        match result {
            Ok(places) => {
                tracing::info!("✅ Showing {} place(s) from search #{}", places.len(), generation);
                for place in &places {
                    let marker = self.marker_factory.build(place, &self.categories);
                    self.ports.map.add_marker(marker);
                }
            }
            Err(e) => self.report(e),
        }
    }

    fn on_address_resolved(&mut self, coordinate: Coordinate, result: Result<AddressLines>) {
        let lines = match result {
            Ok(lines) if lines.iter().any(|line| !line.trim().is_empty()) => lines,
            Ok(_) => {
                self.report(DiscoveryError::geocode_failed(format!(
                    "no address lines for {}",
                    coordinate
                )));
                return;
            }
            Err(e) => {
                self.report(e);
                return;
            }
        };

        let text = lines.join("\n");
        tracing::debug!("Address for {}: {:?}", coordinate, text);
        self.ports.address.show_address(&text);
        self.displayed_address = Some(text);
    }

    fn report(&self, error: DiscoveryError) {
        tracing::warn!("⚠️ {} ({:?})", error, error.category());
        self.ports.observer.report(&error);
    }
}
