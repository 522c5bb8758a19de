use crate::adapters::http;
use crate::domain::model::{AddressLines, Coordinate};
use crate::domain::ports::ReverseGeocoder;
use crate::utils::error::{DiscoveryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

/// 把 "350 5th Ave, New York, NY 10118, USA" 拆成街道與其餘部分兩行
pub fn split_address_lines(formatted: &str) -> AddressLines {
    let formatted = formatted.trim();
    if formatted.is_empty() {
        return Vec::new();
    }

    match formatted.split_once(", ") {
        Some((street, rest)) => vec![street.to_string(), rest.to_string()],
        None => vec![formatted.to_string()],
    }
}

impl GoogleGeocoder {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for GoogleGeocoder {
    async fn resolve(&self, coordinate: Coordinate) -> Result<AddressLines> {
        let url = http::build_url(
            &self.endpoint,
            &[
                ("latlng", coordinate.to_string()),
                ("key", self.api_key.clone()),
            ],
        )?;

        let body: GeocodeResponse =
            http::get_json(&self.client, url, DiscoveryError::geocode_failed).await?;

        match body.status.as_str() {
            "OK" => Ok(body
                .results
                .first()
                .map(|r| split_address_lines(&r.formatted_address))
                .unwrap_or_default()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(DiscoveryError::geocode_failed(format!(
                "{}{}",
                status,
                body.error_message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ))),
        }
    }
}
