use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{OpenMeteoError, Result};

pub const DEFAULT_FORECAST_HOST: &str = "https://api.open-meteo.com";
pub const DEFAULT_GEOCODING_HOST: &str = "https://geocoding-api.open-meteo.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration.
///
/// Built in code or parsed from TOML; every field is optional there:
///
/// ```toml
/// forecast_host = "https://api.open-meteo.com"
/// geocoding_host = "https://geocoding-api.open-meteo.com"
/// request_timeout_secs = 10.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host serving `/v1/forecast`.
    pub forecast_host: String,

    /// Host serving `/v1/search`.
    pub geocoding_host: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: f64,

    /// Sent as `User-Agent` by the session the client creates itself.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            forecast_host: DEFAULT_FORECAST_HOST.to_string(),
            geocoding_host: DEFAULT_GEOCODING_HOST.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS as f64,
            user_agent: concat!("open-meteo-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Point both endpoints at the same host, e.g. a mock server.
    pub fn with_host(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            forecast_host: host.clone(),
            geocoding_host: host,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs_f64();
        self
    }

    /// Parse a TOML document; missing keys fall back to their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: ClientConfig = toml::from_str(contents)
            .map_err(|e| OpenMeteoError::Config(format!("Failed to parse configuration: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The configured timeout, or the default one when the value is not a
    /// representable duration. [`ClientConfig::validate`] rejects such values.
    pub fn request_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_timeout_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Check the hosts are usable base URLs and the timeout is positive.
    pub fn validate(&self) -> Result<()> {
        base_url(&self.forecast_host)?;
        base_url(&self.geocoding_host)?;

        let timeout = Duration::try_from_secs_f64(self.request_timeout_secs).map_err(|e| {
            OpenMeteoError::Config(format!(
                "request_timeout_secs must be a positive number of seconds, got {}: {e}",
                self.request_timeout_secs
            ))
        })?;
        if timeout.is_zero() {
            return Err(OpenMeteoError::Config(format!(
                "request_timeout_secs must be a positive number of seconds, got {}",
                self.request_timeout_secs
            )));
        }

        Ok(())
    }
}

/// Parse `host` as an http(s) base URL.
pub(crate) fn base_url(host: &str) -> Result<Url> {
    let url = Url::parse(host)
        .map_err(|e| OpenMeteoError::Config(format!("Invalid API host '{host}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(OpenMeteoError::Config(format!(
            "Unsupported scheme '{other}' in API host '{host}'"
        ))),
    }
}
