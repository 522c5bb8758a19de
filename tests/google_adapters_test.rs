use feedme_discovery::adapters::{GoogleGeocoder, GooglePlacesProvider};
use feedme_discovery::domain::model::{CategorySet, Coordinate};
use feedme_discovery::domain::ports::{PlacesDataProvider, ReverseGeocoder};
use feedme_discovery::DiscoveryError;
use httpmock::prelude::*;

fn nearby_payload() -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "results": [
            {
                "place_id": "ChIJ1",
                "name": "Blue Bottle",
                "vicinity": "1 Ferry Building, San Francisco",
                "types": ["cafe", "food", "point_of_interest"],
                "geometry": { "location": { "lat": 37.7955, "lng": -122.3937 } },
                "rating": 4.5,
                "price_level": 2,
                "photos": [{ "photo_reference": "photo-1" }]
            },
            {
                "place_id": "ChIJ2",
                "name": "Zeitgeist",
                "types": ["bar"],
                "geometry": { "location": { "lat": 37.7700, "lng": -122.4222 } }
            }
        ]
    })
}

#[tokio::test]
async fn test_places_search_parses_results() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/nearbysearch/json")
                .query_param("location", "37.33,-122.03")
                .query_param("radius", "1000")
                .query_param("types", "bar|cafe")
                .query_param("key", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(nearby_payload());
        })
        .await;

    let provider =
        GooglePlacesProvider::new(server.url("/nearbysearch/json"), "test-key", 5).unwrap();
    let places = provider
        .search(
            Coordinate::new(37.33, -122.03),
            1000.0,
            &CategorySet::new(["cafe", "bar"]),
        )
        .await
        .unwrap();

    api_mock.assert_async().await;
    assert_eq!(places.len(), 2);
    assert_eq!(places[0].id, "ChIJ1");
    assert_eq!(places[0].address.as_deref(), Some("1 Ferry Building, San Francisco"));
    assert_eq!(places[0].rating, Some(4.5));
    assert_eq!(places[0].price_level, Some(2));
    assert_eq!(places[0].photo_reference.as_deref(), Some("photo-1"));
    assert_eq!(places[1].address, None);
    assert_eq!(places[1].coordinate, Coordinate::new(37.77, -122.4222));
}

#[tokio::test]
async fn test_places_search_zero_results_is_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby");
            then.status(200)
                .json_body(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }));
        })
        .await;

    let provider = GooglePlacesProvider::new(server.url("/nearby"), "k", 5).unwrap();
    let places = provider
        .search(Coordinate::new(0.0, 0.0), 500.0, &CategorySet::defaults())
        .await
        .unwrap();

    assert!(places.is_empty());
}

#[tokio::test]
async fn test_places_api_status_error_is_search_failed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby");
            then.status(200).json_body(serde_json::json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid."
            }));
        })
        .await;

    let provider = GooglePlacesProvider::new(server.url("/nearby"), "bad", 5).unwrap();
    let err = provider
        .search(Coordinate::new(0.0, 0.0), 500.0, &CategorySet::defaults())
        .await
        .unwrap_err();

    match err {
        DiscoveryError::SearchFailed { message } => {
            assert!(message.contains("REQUEST_DENIED"));
            assert!(message.contains("API key is invalid"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_places_http_error_is_search_failed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby");
            then.status(500);
        })
        .await;

    let provider = GooglePlacesProvider::new(server.url("/nearby"), "k", 5).unwrap();
    let err = provider
        .search(Coordinate::new(0.0, 0.0), 500.0, &CategorySet::defaults())
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::SearchFailed { .. }));
}

#[tokio::test]
async fn test_places_search_rejects_empty_categories_without_request() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nearby");
            then.status(200).json_body(nearby_payload());
        })
        .await;

    let provider = GooglePlacesProvider::new(server.url("/nearby"), "k", 5).unwrap();
    let result = provider
        .search(Coordinate::new(0.0, 0.0), 500.0, &CategorySet::default())
        .await;

    assert!(result.is_err());
    assert_eq!(api_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_geocoder_splits_formatted_address() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/geocode/json")
                .query_param("latlng", "40.7,-74")
                .query_param("key", "geo-key");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [
                    { "formatted_address": "350 5th Ave, New York, NY 10118, USA" },
                    { "formatted_address": "Midtown, New York, NY, USA" }
                ]
            }));
        })
        .await;

    let geocoder = GoogleGeocoder::new(server.url("/geocode/json"), "geo-key", 5).unwrap();
    let lines = geocoder.resolve(Coordinate::new(40.7, -74.0)).await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(lines, vec!["350 5th Ave", "New York, NY 10118, USA"]);
}

#[tokio::test]
async fn test_geocoder_zero_results_is_empty_lines() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(200)
                .json_body(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }));
        })
        .await;

    let geocoder = GoogleGeocoder::new(server.url("/geocode/json"), "k", 5).unwrap();
    let lines = geocoder.resolve(Coordinate::new(0.0, -30.0)).await.unwrap();

    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_geocoder_http_error_is_geocode_failed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(503);
        })
        .await;

    let geocoder = GoogleGeocoder::new(server.url("/geocode/json"), "k", 5).unwrap();
    let err = geocoder.resolve(Coordinate::new(1.0, 1.0)).await.unwrap_err();

    assert!(matches!(err, DiscoveryError::GeocodeFailed { .. }));
}
