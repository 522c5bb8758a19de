use crate::adapters::http;
use crate::domain::model::{CategorySet, Coordinate, Place};
use crate::domain::ports::PlacesDataProvider;
use crate::utils::error::{DiscoveryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Google Places Nearby Search 的 `PlacesDataProvider` 實作
pub struct GooglePlacesProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    geometry: Geometry,
    rating: Option<f32>,
    price_level: Option<u8>,
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: String,
}

impl From<PlaceResult> for Place {
    fn from(result: PlaceResult) -> Self {
        Place {
            id: result.place_id,
            name: result.name,
            address: result.vicinity,
            coordinate: Coordinate::new(result.geometry.location.lat, result.geometry.location.lng),
            categories: result.types,
            rating: result.rating,
            price_level: result.price_level,
            photo_reference: result.photos.into_iter().next().map(|p| p.photo_reference),
        }
    }
}

impl GooglePlacesProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl PlacesDataProvider for GooglePlacesProvider {
    async fn search(
        &self,
        near: Coordinate,
        radius_meters: f64,
        categories: &CategorySet,
    ) -> Result<Vec<Place>> {
        // 沒有 types 參數的查詢會回傳所有地點
        if categories.is_empty() {
            return Err(DiscoveryError::search_failed(
                "refusing to search without any category",
            ));
        }

        let url = http::build_url(
            &self.endpoint,
            &[
                ("location", near.to_string()),
                ("radius", radius_meters.to_string()),
                ("rankby", "prominence".to_string()),
                ("types", categories.to_query_param()),
                ("key", self.api_key.clone()),
            ],
        )?;

        let body: NearbySearchResponse =
            http::get_json(&self.client, url, DiscoveryError::search_failed).await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                tracing::debug!("Places API returned {} result(s)", body.results.len());
                Ok(body.results.into_iter().map(Place::from).collect())
            }
            status => Err(DiscoveryError::search_failed(format!(
                "{}{}",
                status,
                body.error_message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ))),
        }
    }
}
