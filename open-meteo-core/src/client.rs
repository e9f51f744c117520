use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::instrument;

use crate::{
    config::ClientConfig,
    error::Result,
    mapper::{self, JsonObject},
    model::{Forecast, ForecastRequest, Geocoding, GeocodingRequest},
    query::{Endpoint, QueryParams},
    transport::Transport,
};

/// Source of forecasts and location lookups.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn forecast(&self, request: &ForecastRequest) -> Result<Forecast>;

    async fn geocoding(&self, request: &GeocodingRequest) -> Result<Geocoding>;
}

/// Asynchronous client for the Open-Meteo API.
///
/// The HTTP session is either supplied by the caller ([`OpenMeteo::with_session`])
/// and left alone, or created on the first request and released by
/// [`OpenMeteo::close`] or when the client is dropped.
#[derive(Debug)]
pub struct OpenMeteo {
    transport: Transport,
}

impl OpenMeteo {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport: Transport::owned(config),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Use `session` for every request. The client never releases it.
    pub fn with_session(config: ClientConfig, session: Client) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport: Transport::borrowed(config, session),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Whether the session is the client's own rather than caller-supplied.
    pub fn owns_session(&self) -> bool {
        self.transport.owns_session()
    }

    /// Whether a session is currently open.
    pub fn has_session(&self) -> bool {
        self.transport.has_session()
    }

    /// Release the owned session, if one was created. A caller-supplied session
    /// is left untouched. The next request opens a fresh owned session.
    pub fn close(&mut self) -> bool {
        self.transport.release()
    }

    /// Raw request: one GET against `endpoint`, JSON object returned as-is.
    pub async fn request(&self, endpoint: Endpoint, params: &QueryParams) -> Result<JsonObject> {
        self.transport.get(endpoint, params).await
    }

    #[instrument(skip(self, request), fields(lat = %request.latitude, lon = %request.longitude))]
    pub async fn forecast(&self, request: &ForecastRequest) -> Result<Forecast> {
        let data = self.request(Endpoint::Forecast, &request.to_query()).await?;
        mapper::forecast(&data)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn geocoding(&self, request: &GeocodingRequest) -> Result<Geocoding> {
        let data = self.request(Endpoint::Geocoding, &request.to_query()).await?;
        mapper::geocoding(&data)
    }
}

#[async_trait]
impl WeatherApi for OpenMeteo {
    async fn forecast(&self, request: &ForecastRequest) -> Result<Forecast> {
        OpenMeteo::forecast(self, request).await
    }

    async fn geocoding(&self, request: &GeocodingRequest) -> Result<Geocoding> {
        OpenMeteo::geocoding(self, request).await
    }
}
