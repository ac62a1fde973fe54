//! Error types and handling for `TripFinder`

use thiserror::Error;

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nearby place discovery
    Places,
    /// Outward and return itinerary resolution
    Itineraries,
    /// Weather forecasts for the remaining candidates
    Forecasts,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Places => "places",
            Stage::Itineraries => "itineraries",
            Stage::Forecasts => "forecasts",
        };
        f.write_str(name)
    }
}

/// Main error type for `TripFinder`
#[derive(Error, Debug)]
pub enum TripError {
    /// Malformed search query, rejected before any provider call
    #[error("Invalid query: {message}")]
    Validation { message: String },

    /// Transport-level failure or timeout of a provider call
    #[error("Provider {provider} unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    /// A provider was asked for something outside its contract
    #[error("Contract violation: {message}")]
    ContractViolation { message: String },

    /// Every provider call of a stage failed at the transport level
    #[error("Providers exhausted during {stage} stage: {message}")]
    Exhausted { stage: Stage, message: String },

    /// Provider payload did not match the expected schema
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new provider unavailable error
    pub fn provider_unavailable<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new contract violation error
    pub fn contract_violation<S: Into<String>>(message: S) -> Self {
        Self::ContractViolation {
            message: message.into(),
        }
    }

    /// Create a new exhausted error for the given stage
    pub fn exhausted<S: Into<String>>(stage: Stage, message: S) -> Self {
        Self::Exhausted {
            stage,
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Whether the error means the provider could not answer, as opposed to
    /// the request itself being wrong
    #[must_use]
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. } | Self::Parse { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripError::Validation { message } => format!("Invalid search: {message}"),
            TripError::ProviderUnavailable { provider, .. } => {
                format!("Unable to reach {provider}. Please check your internet connection.")
            }
            TripError::ContractViolation { message } => message.clone(),
            TripError::Exhausted { .. } => {
                "External services are currently unavailable. Please try again later.".to_string()
            }
            TripError::Parse { .. } => {
                "An external service returned unexpected data.".to_string()
            }
            TripError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            TripError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for TripError {
    fn from(err: serde_json::Error) -> Self {
        TripError::parse(err.to_string())
    }
}
