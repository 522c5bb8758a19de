use crate::utils::error::{DiscoveryError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(DiscoveryError::ApiError)
}

pub fn build_url(endpoint: &str, params: &[(&str, String)]) -> Result<Url> {
    Url::parse_with_params(endpoint, params).map_err(|e| DiscoveryError::InvalidConfigValueError {
        field: "endpoint".to_string(),
        value: endpoint.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

/// GET 並解析 JSON。非 2xx 狀態以 `on_status` 產生對應的錯誤。
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    on_status: impl FnOnce(String) -> DiscoveryError,
) -> Result<T> {
    tracing::debug!("Making API request to: {}", url.path());
    let response = client.get(url).send().await?;

    tracing::debug!("API response status: {}", response.status());
    if !response.status().is_success() {
        return Err(on_status(format!("HTTP {}", response.status())));
    }

    Ok(response.json::<T>().await?)
}
