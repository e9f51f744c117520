//! Request and response types.

use serde::{Deserialize, Serialize};

use crate::query::QueryParams;

pub mod forecast;
pub mod geocoding;
pub mod params;

pub use forecast::{
    CurrentWeather, DailyForecast, DailyUnits, Forecast, HourlyForecast, HourlyUnits, Series,
    TimeSeries, Units,
};
pub use geocoding::{Geocoding, GeocodingResult};
pub use params::{
    DailyVariable, HourlyVariable, PrecipitationUnit, TemperatureUnit, TimeFormat, ValueKind,
    Variable, WindSpeedUnit,
};

/// Parameters of a forecast request.
///
/// Coordinates, variables and units are passed to the API as given; the API
/// is the one rejecting out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA name, `auto`, or `UTC`. Timestamps come back in this zone.
    pub timezone: String,
    pub current_weather: bool,
    pub hourly: Vec<HourlyVariable>,
    pub daily: Vec<DailyVariable>,
    /// Also return this many past days (0-2).
    pub past_days: u8,
    pub precipitation_unit: PrecipitationUnit,
    pub temperature_unit: TemperatureUnit,
    pub timeformat: TimeFormat,
    pub wind_speed_unit: WindSpeedUnit,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            timezone: "UTC".to_string(),
            current_weather: false,
            hourly: Vec::new(),
            daily: Vec::new(),
            past_days: 0,
            precipitation_unit: PrecipitationUnit::Millimeters,
            temperature_unit: TemperatureUnit::Celsius,
            timeformat: TimeFormat::Iso8601,
            wind_speed_unit: WindSpeedUnit::KilometersPerHour,
        }
    }
}

impl ForecastRequest {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    pub fn with_current_weather(mut self) -> Self {
        self.current_weather = true;
        self
    }

    pub fn with_hourly(mut self, variables: impl IntoIterator<Item = HourlyVariable>) -> Self {
        self.hourly.extend(variables);
        self
    }

    pub fn with_daily(mut self, variables: impl IntoIterator<Item = DailyVariable>) -> Self {
        self.daily.extend(variables);
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("current_weather", self.current_weather)
            .with_opt("daily", join(&self.daily))
            .with_opt("hourly", join(&self.hourly))
            .with("latitude", self.latitude)
            .with("longitude", self.longitude)
            .with("past_days", self.past_days)
            .with("precipitation_unit", self.precipitation_unit)
            .with("temperature_unit", self.temperature_unit)
            .with("timeformat", self.timeformat)
            .with("timezone", &self.timezone)
            .with("windspeed_unit", self.wind_speed_unit)
    }
}

/// Parameters of a location search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingRequest {
    /// Fewer than 2 characters return nothing, 3 or more match fuzzily.
    pub name: String,
    /// Up to 100.
    pub count: u8,
    /// Lower-case language code for translated names.
    pub language: String,
}

impl GeocodingRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 10,
            language: "en".to_string(),
        }
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("name", &self.name)
            .with("count", self.count)
            .with("format", "json")
            .with("language", &self.language)
    }
}

fn join<V: Variable>(variables: &[V]) -> Option<String> {
    if variables.is_empty() {
        return None;
    }
    Some(
        variables
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(","),
    )
}
