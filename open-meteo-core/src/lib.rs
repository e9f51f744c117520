//! Asynchronous client for the Open-Meteo API.
//!
//! This crate defines:
//! - Client configuration and HTTP session ownership
//! - A thin transport issuing one GET per call
//! - Explicit mapping of JSON responses into typed forecast and geocoding models
//!
//! ```no_run
//! use open_meteo_core::{ForecastRequest, HourlyVariable, OpenMeteo};
//!
//! # async fn run() -> open_meteo_core::Result<()> {
//! let mut client = OpenMeteo::with_defaults()?;
//! let forecast = client
//!     .forecast(
//!         &ForecastRequest::new(52.27, 6.87417)
//!             .with_current_weather()
//!             .with_hourly([HourlyVariable::Temperature2m]),
//!     )
//!     .await?;
//! println!("{:?}", forecast.current_weather);
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod query;
mod transport;

pub use client::{OpenMeteo, WeatherApi};
pub use config::ClientConfig;
pub use error::{OpenMeteoError, Result};
pub use model::{
    CurrentWeather, DailyForecast, DailyVariable, Forecast, ForecastRequest, Geocoding,
    GeocodingRequest, GeocodingResult, HourlyForecast, HourlyVariable, PrecipitationUnit, Series,
    TemperatureUnit, TimeFormat, TimeSeries, Units, ValueKind, Variable, WindSpeedUnit,
};
pub use query::{Endpoint, QueryParams};
