use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::params::{DailyVariable, HourlyVariable, TimeFormat, Variable};

/// Values of one variable, index-aligned with the `time` axis of its block.
///
/// Missing data points (`null` in the response) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    Float(Vec<Option<f64>>),
    Integer(Vec<Option<i64>>),
    Timestamp(Vec<Option<DateTime<FixedOffset>>>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Series::Float(v) => v.len(),
            Series::Integer(v) => v.len(),
            Series::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A group of variables sharing one time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries<V: Variable, T> {
    pub time: Vec<T>,
    series: BTreeMap<V, Series>,
}

impl<V: Variable, T> TimeSeries<V, T> {
    /// Callers are expected to have checked every series against `time.len()`.
    pub(crate) fn new(time: Vec<T>, series: BTreeMap<V, Series>) -> Self {
        Self { time, series }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn get(&self, variable: V) -> Option<&Series> {
        self.series.get(&variable)
    }

    pub fn contains(&self, variable: V) -> bool {
        self.series.contains_key(&variable)
    }

    /// Variables present in the response, in enum order.
    pub fn variables(&self) -> impl Iterator<Item = V> + '_ {
        self.series.keys().copied()
    }

    /// Float series for `variable`, or an empty slice when it was not returned.
    pub fn floats(&self, variable: V) -> &[Option<f64>] {
        match self.series.get(&variable) {
            Some(Series::Float(v)) => v,
            _ => &[],
        }
    }

    /// Integer series for `variable`, or an empty slice when it was not returned.
    pub fn integers(&self, variable: V) -> &[Option<i64>] {
        match self.series.get(&variable) {
            Some(Series::Integer(v)) => v,
            _ => &[],
        }
    }

    /// Timestamp series for `variable`, or an empty slice when it was not returned.
    pub fn timestamps(&self, variable: V) -> &[Option<DateTime<FixedOffset>>] {
        match self.series.get(&variable) {
            Some(Series::Timestamp(v)) => v,
            _ => &[],
        }
    }
}

pub type HourlyForecast = TimeSeries<HourlyVariable, DateTime<FixedOffset>>;
pub type DailyForecast = TimeSeries<DailyVariable, NaiveDate>;

/// Unit labels of a block, as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Units<V: Variable> {
    pub time: Option<TimeFormat>,
    pub values: BTreeMap<V, String>,
}

impl<V: Variable> Units<V> {
    pub fn get(&self, variable: V) -> Option<&str> {
        self.values.get(&variable).map(String::as_str)
    }
}

pub type HourlyUnits = Units<HourlyVariable>;
pub type DailyUnits = Units<DailyVariable>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub time: DateTime<FixedOffset>,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: i64,
    pub weather_code: i64,
}

/// Weather forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub generation_time_ms: f64,
    /// Offset reported for the request. Each timestamp carries its own offset,
    /// which differs from this one across a DST change.
    pub utc_offset_seconds: i32,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub current_weather: Option<CurrentWeather>,
    pub hourly: Option<HourlyForecast>,
    pub hourly_units: Option<HourlyUnits>,
    pub daily: Option<DailyForecast>,
    pub daily_units: Option<DailyUnits>,
}
