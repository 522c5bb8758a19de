use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Location permission not granted: {status}")]
    PermissionDenied { status: String },

    #[error("Location unavailable: {message}")]
    LocationUnavailable { message: String },

    #[error("Place search failed: {message}")]
    SearchFailed { message: String },

    #[error("Reverse geocoding failed: {message}")]
    GeocodeFailed { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Permission,
    Location,
    Network,
    Geocoding,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DiscoveryError {
    pub fn search_failed(message: impl Into<String>) -> Self {
        Self::SearchFailed {
            message: message.into(),
        }
    }

    pub fn geocode_failed(message: impl Into<String>) -> Self {
        Self::GeocodeFailed {
            message: message.into(),
        }
    }

    pub fn location_unavailable(message: impl Into<String>) -> Self {
        Self::LocationUnavailable {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PermissionDenied { .. } => ErrorCategory::Permission,
            Self::LocationUnavailable { .. } => ErrorCategory::Location,
            Self::SearchFailed { .. } | Self::ApiError(_) => ErrorCategory::Network,
            Self::GeocodeFailed { .. } => ErrorCategory::Geocoding,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// 協調器層級的錯誤都只終止當次操作，所以都不超過 Medium
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Geocoding => ErrorSeverity::Low,
            ErrorCategory::Permission | ErrorCategory::Location | ErrorCategory::Network => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::PermissionDenied { .. } => {
                "Location access is off, nearby places cannot be shown".to_string()
            }
            Self::LocationUnavailable { .. } => "Your location could not be determined".to_string(),
            Self::SearchFailed { .. } | Self::ApiError(_) => {
                "Nearby places could not be loaded".to_string()
            }
            Self::GeocodeFailed { .. } => "No address available for this spot".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Permission => "Allow location access in the system settings",
            ErrorCategory::Location => "Move to an area with better signal and try again",
            ErrorCategory::Network => "Check the network connection and the Places API key",
            ErrorCategory::Geocoding => "Pan the map slightly to retry the address lookup",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
