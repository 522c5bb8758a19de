use anyhow::Result;
use feedme_discovery::adapters::{FixedLocationWatcher, GoogleGeocoder, GooglePlacesProvider};
use feedme_discovery::domain::model::{AuthorizationStatus, CategorySet, Coordinate, Marker};
use feedme_discovery::domain::ports::{
    AddressDisplay, DiscoveryObserver, FilterSelectionUi, MapSurface,
};
use feedme_discovery::{
    DiscoveryCoordinator, DiscoveryError, DiscoveryHandle, DiscoveryInbox, DiscoveryPorts,
    DiscoverySettings, MarkerFactory,
};
use httpmock::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Screen {
    markers: Vec<Marker>,
    camera: Option<(Coordinate, f32)>,
    center: Option<Coordinate>,
    address: Option<String>,
    live_location: bool,
    filter_visible: bool,
    errors: Vec<String>,
}

/// 地圖、地址標籤、篩選介面與觀察者共用同一個畫面狀態
#[derive(Clone, Default)]
struct FakeScreen {
    state: Arc<Mutex<Screen>>,
    handle: Arc<Mutex<Option<DiscoveryHandle>>>,
}

impl MapSurface for FakeScreen {
    fn clear_markers(&mut self) {
        self.state.lock().unwrap().markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.state.lock().unwrap().markers.push(marker);
    }

    fn set_camera(&mut self, target: Coordinate, zoom: f32) {
        {
            let mut state = self.state.lock().unwrap();
            state.camera = Some((target, zoom));
            state.center = Some(target);
        }
        if let Some(handle) = self.handle.lock().unwrap().as_ref() {
            handle.viewport_settled(target);
        }
    }

    fn enable_live_location_indicator(&mut self, enabled: bool) {
        self.state.lock().unwrap().live_location = enabled;
    }

    fn current_viewport_center(&self) -> Coordinate {
        self.state
            .lock()
            .unwrap()
            .center
            .unwrap_or(Coordinate::new(0.0, 0.0))
    }
}

impl AddressDisplay for FakeScreen {
    fn show_address(&mut self, text: &str) {
        self.state.lock().unwrap().address = Some(text.to_string());
    }
}

impl FilterSelectionUi for FakeScreen {
    fn present(&mut self, _preselected: &CategorySet) {
        self.state.lock().unwrap().filter_visible = true;
    }

    fn dismiss(&mut self) {
        self.state.lock().unwrap().filter_visible = false;
    }
}

impl DiscoveryObserver for FakeScreen {
    fn report(&self, error: &DiscoveryError) {
        self.state.lock().unwrap().errors.push(error.to_string());
    }
}

struct App {
    coordinator: DiscoveryCoordinator,
    inbox: DiscoveryInbox,
    screen: FakeScreen,
}

fn build_app(server: &MockServer, grant: bool, fix: Coordinate) -> Result<App> {
    let (handle, inbox) = DiscoveryHandle::channel();
    let screen = FakeScreen::default();
    *screen.handle.lock().unwrap() = Some(handle.clone());

    let ports = DiscoveryPorts {
        geolocation: Box::new(FixedLocationWatcher::new(
            AuthorizationStatus::NotDetermined,
            grant,
            Some(fix),
        )),
        places: Arc::new(GooglePlacesProvider::new(server.url("/nearby"), "k", 5)?),
        geocoder: Arc::new(GoogleGeocoder::new(server.url("/geocode"), "k", 5)?),
        map: Box::new(screen.clone()),
        address: Box::new(screen.clone()),
        filter_ui: Box::new(screen.clone()),
        observer: Arc::new(screen.clone()),
    };

    let coordinator = DiscoveryCoordinator::new(
        ports,
        DiscoverySettings::default(),
        MarkerFactory::default(),
        handle,
    );

    Ok(App {
        coordinator,
        inbox,
        screen,
    })
}

fn place_json(id: &str, types: &[&str], lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "place_id": id,
        "name": format!("Place {}", id),
        "vicinity": "Cupertino",
        "types": types,
        "geometry": { "location": { "lat": lat, "lng": lng } }
    })
}

#[tokio::test]
async fn test_first_launch_flow_centers_map_and_shows_places() -> Result<()> {
    let server = MockServer::start_async().await;
    let places_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nearby")
                .query_param("location", "37.33,-122.03")
                .query_param("radius", "1000");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [
                    place_json("1", &["cafe"], 37.331, -122.03),
                    place_json("2", &["bakery", "cafe"], 37.332, -122.03),
                    place_json("3", &["night_club"], 37.333, -122.03)
                ]
            }));
        })
        .await;
    let geocode_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [{ "formatted_address": "1 Infinite Loop, Cupertino, CA 95014, USA" }]
            }));
        })
        .await;

    let fix = Coordinate::new(37.33, -122.03);
    let mut app = build_app(&server, true, fix)?;

    app.coordinator.start();
    app.coordinator.run_until_idle(&mut app.inbox).await;

    places_mock.assert_async().await;
    geocode_mock.assert_async().await;

    let screen = app.screen.state.lock().unwrap();
    assert!(screen.live_location);
    assert_eq!(screen.camera, Some((fix, 15.0)));
    assert_eq!(screen.markers.len(), 3);

    let icons: Vec<&str> = screen.markers.iter().map(|m| m.style.icon.as_str()).collect();
    assert_eq!(icons, vec!["cafe_pin", "bakery_pin", "default_pin"]);

    assert_eq!(
        screen.address.as_deref(),
        Some("1 Infinite Loop\nCupertino, CA 95014, USA")
    );
    assert!(screen.errors.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_denied_permission_shows_nothing_and_reports() -> Result<()> {
    let server = MockServer::start_async().await;
    let places_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby");
            then.status(200)
                .json_body(serde_json::json!({ "status": "ZERO_RESULTS" }));
        })
        .await;

    let mut app = build_app(&server, false, Coordinate::new(37.33, -122.03))?;

    app.coordinator.start();
    app.coordinator.run_until_idle(&mut app.inbox).await;

    assert_eq!(places_mock.hits_async().await, 0);
    let screen = app.screen.state.lock().unwrap();
    assert!(screen.markers.is_empty());
    assert!(!screen.live_location);
    assert_eq!(screen.errors.len(), 1);
    assert!(screen.errors[0].contains("denied"));
    Ok(())
}

#[tokio::test]
async fn test_filter_change_refetches_with_sorted_categories() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode");
            then.status(200)
                .json_body(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }));
        })
        .await;
    let default_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nearby")
                .query_param("types", "bakery|bar|cafe|grocery_or_supermarket|restaurant");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [place_json("d1", &["restaurant"], 1.0, 1.0)]
            }));
        })
        .await;
    let filtered_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby").query_param("types", "bar|cafe");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [
                    place_json("f1", &["bar"], 1.0, 1.0),
                    place_json("f2", &["cafe"], 1.001, 1.0)
                ]
            }));
        })
        .await;

    let mut app = build_app(&server, true, Coordinate::new(1.0, 1.0))?;
    app.coordinator.start();
    app.coordinator.run_until_idle(&mut app.inbox).await;
    assert_eq!(app.screen.state.lock().unwrap().markers.len(), 1);

    let handle = app.coordinator.handle();
    handle.open_filter_selection();
    app.coordinator.run_until_idle(&mut app.inbox).await;
    assert!(app.screen.state.lock().unwrap().filter_visible);

    handle.filter_committed(CategorySet::new(["cafe", "bar"]));
    app.coordinator.run_until_idle(&mut app.inbox).await;

    default_mock.assert_async().await;
    filtered_mock.assert_async().await;
    assert_eq!(
        app.coordinator.active_categories().to_sorted_vec(),
        vec!["bar", "cafe"]
    );

    let screen = app.screen.state.lock().unwrap();
    assert!(!screen.filter_visible);
    let ids: Vec<&str> = screen.markers.iter().map(|m| m.place_id.as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2"]);
    // ZERO_RESULTS 的反向地理編碼只會回報，不會改動地址
    assert_eq!(screen.address, None);
    assert_eq!(screen.errors.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_manual_refresh_after_search_outage_recovers() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [{ "formatted_address": "Somewhere" }]
            }));
        })
        .await;
    let mut outage = server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby");
            then.status(502);
        })
        .await;

    let mut app = build_app(&server, true, Coordinate::new(5.0, 5.0))?;
    app.coordinator.start();
    app.coordinator.run_until_idle(&mut app.inbox).await;

    {
        let screen = app.screen.state.lock().unwrap();
        assert!(screen.markers.is_empty());
        assert_eq!(screen.errors.len(), 1);
        assert_eq!(screen.address.as_deref(), Some("Somewhere"));
    }

    outage.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [place_json("r1", &["cafe"], 5.0, 5.0)]
            }));
        })
        .await;

    app.coordinator.handle().manual_refresh();
    app.coordinator.run_until_idle(&mut app.inbox).await;

    assert_eq!(app.screen.state.lock().unwrap().markers.len(), 1);
    Ok(())
}
