use crate::core::coordinator::{DiscoverySettings, DEFAULT_SEARCH_RADIUS_METERS, DEFAULT_ZOOM};
use crate::core::markers::{MarkerFactory, DEFAULT_FALLBACK_ICON};
use crate::domain::model::{CategorySet, DEFAULT_CATEGORIES};
use crate::utils::error::{DiscoveryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const GOOGLE_PLACES_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
pub const GOOGLE_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub markers: MarkersConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
    #[serde(default = "default_categories")]
    pub default_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_zoom")]
    pub default_zoom: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersConfig {
    #[serde(default = "default_categories")]
    pub known_icons: Vec<String>,
    #[serde(default = "default_fallback_icon")]
    pub fallback_icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_places_endpoint")]
    pub places_endpoint: String,
    #[serde(default = "default_geocode_endpoint")]
    pub geocode_endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
}

fn default_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS_METERS
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn default_zoom() -> f32 {
    DEFAULT_ZOOM
}

fn default_fallback_icon() -> String {
    DEFAULT_FALLBACK_ICON.to_string()
}

fn default_places_endpoint() -> String {
    GOOGLE_PLACES_ENDPOINT.to_string()
}

fn default_geocode_endpoint() -> String {
    GOOGLE_GEOCODE_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: default_radius(),
            default_categories: default_categories(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_zoom: default_zoom(),
        }
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            known_icons: default_categories(),
            fallback_icon: default_fallback_icon(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            places_endpoint: default_places_endpoint(),
            geocode_endpoint: default_geocode_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl DiscoveryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DiscoveryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DiscoveryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DiscoveryError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得 API 金鑰，未設定或環境變數沒有被替換時視為缺少
    pub fn api_key(&self) -> Result<&str> {
        match self.google.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() && !key.starts_with("${") => Ok(key),
            _ => Err(DiscoveryError::MissingConfigError {
                field: "google.api_key".to_string(),
            }),
        }
    }

    pub fn settings(&self) -> DiscoverySettings {
        DiscoverySettings {
            search_radius_meters: self.search.radius_meters,
            default_zoom: self.map.default_zoom,
            default_categories: CategorySet::new(self.search.default_categories.iter().cloned()),
        }
    }

    pub fn marker_factory(&self) -> MarkerFactory {
        MarkerFactory::new(
            self.markers.known_icons.iter().cloned(),
            self.markers.fallback_icon.clone(),
        )
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("search.radius_meters", self.search.radius_meters, 1.0, 50_000.0)?;
        validation::validate_non_empty_list(
            "search.default_categories",
            &self.search.default_categories,
        )?;
        validation::validate_range("map.default_zoom", self.map.default_zoom, 1.0, 21.0)?;
        validation::validate_non_empty_string("markers.fallback_icon", &self.markers.fallback_icon)?;
        validation::validate_url("google.places_endpoint", &self.google.places_endpoint)?;
        validation::validate_url("google.geocode_endpoint", &self.google.geocode_endpoint)?;

        if self.google.timeout_seconds == 0 {
            return Err(DiscoveryError::InvalidConfigValueError {
                field: "google.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        self.api_key()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.monitoring.log_level.as_str()) {
            return Err(DiscoveryError::InvalidConfigValueError {
                field: "monitoring.log_level".to_string(),
                value: self.monitoring.log_level.clone(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for DiscoveryConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
