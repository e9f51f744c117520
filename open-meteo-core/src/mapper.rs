//! Conversion of decoded JSON objects into the typed response models.
//!
//! Every field is read explicitly by name. Required fields that are missing or
//! mistyped produce [`OpenMeteoError::Validation`]; optional fields and
//! variables the API did not return fall back to `None` / empty series.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    error::{OpenMeteoError, Result},
    model::{
        CurrentWeather, Forecast, Geocoding, GeocodingResult, Series, TimeFormat, TimeSeries,
        Units, ValueKind, Variable,
    },
};

pub type JsonObject = Map<String, Value>;

/// Map a `/v1/forecast` response.
pub fn forecast(obj: &JsonObject) -> Result<Forecast> {
    let utc_offset_seconds = required_i64(obj, "utc_offset_seconds")?;
    let offset = i32::try_from(utc_offset_seconds)
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            OpenMeteoError::validation(format!(
                "field `utc_offset_seconds` is out of range: {utc_offset_seconds}"
            ))
        })?;
    let clock = Clock::of(obj, offset);

    let current_weather = match optional_object(obj, "current_weather")? {
        Some(current) => Some(current_weather(current, &clock)?),
        None => None,
    };

    Ok(Forecast {
        latitude: required_f64(obj, "latitude")?,
        longitude: required_f64(obj, "longitude")?,
        elevation: required_f64(obj, "elevation")?,
        generation_time_ms: required_f64(obj, "generationtime_ms")?,
        utc_offset_seconds: offset.local_minus_utc(),
        timezone: optional_str(obj, "timezone")?,
        timezone_abbreviation: optional_str(obj, "timezone_abbreviation")?,
        current_weather,
        hourly: time_series(obj, "hourly", &clock, timestamp)?,
        hourly_units: units(obj, "hourly_units")?,
        daily: time_series(obj, "daily", &clock, date)?,
        daily_units: units(obj, "daily_units")?,
    })
}

/// Map a `/v1/search` response.
pub fn geocoding(obj: &JsonObject) -> Result<Geocoding> {
    let results = match obj.get("results") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item = item.as_object().ok_or_else(|| {
                    OpenMeteoError::validation(format!("`results[{i}]` is not an object"))
                })?;
                geocoding_result(item)
            })
            .collect::<Result<Vec<_>>>()?,
        Some(other) => return Err(wrong_type("results", "an array", other)),
    };

    Ok(Geocoding {
        generation_time_ms: required_f64(obj, "generationtime_ms")?,
        results,
    })
}

fn geocoding_result(obj: &JsonObject) -> Result<GeocodingResult> {
    let postcodes = match obj.get("postcodes") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type("postcodes", "an array of strings", v))
            })
            .collect::<Result<Vec<_>>>()?,
        Some(other) => return Err(wrong_type("postcodes", "an array", other)),
    };

    Ok(GeocodingResult {
        id: required_i64(obj, "id")?,
        name: required_str(obj, "name")?,
        latitude: required_f64(obj, "latitude")?,
        longitude: required_f64(obj, "longitude")?,
        elevation: required_f64(obj, "elevation")?,
        feature_code: required_str(obj, "feature_code")?,
        country_code: required_str(obj, "country_code")?,
        country_id: required_i64(obj, "country_id")?,
        country: required_str(obj, "country")?,
        timezone: required_str(obj, "timezone")?,
        admin1: optional_str(obj, "admin1")?,
        admin1_id: optional_i64(obj, "admin1_id")?,
        admin2: optional_str(obj, "admin2")?,
        admin2_id: optional_i64(obj, "admin2_id")?,
        admin3: optional_str(obj, "admin3")?,
        admin3_id: optional_i64(obj, "admin3_id")?,
        admin4: optional_str(obj, "admin4")?,
        admin4_id: optional_i64(obj, "admin4_id")?,
        population: optional_i64(obj, "population")?,
        postcodes,
        ranking: optional_f64(obj, "ranking")?,
    })
}

fn current_weather(obj: &JsonObject, clock: &Clock) -> Result<CurrentWeather> {
    let time = obj
        .get("time")
        .ok_or_else(|| missing("current_weather.time"))
        .and_then(|v| timestamp(v, clock, None))?;

    Ok(CurrentWeather {
        time,
        temperature: required_f64(obj, "temperature")?,
        wind_speed: required_f64(obj, "windspeed")?,
        wind_direction: required_i64(obj, "winddirection")?,
        weather_code: required_i64(obj, "weathercode")?,
    })
}

/// Read the block at `key`: a `time` array plus one array per variable.
fn time_series<V: Variable, T>(
    obj: &JsonObject,
    key: &str,
    clock: &Clock,
    parse_time: fn(&Value, &Clock, Option<&T>) -> Result<T>,
) -> Result<Option<TimeSeries<V, T>>> {
    let Some(block) = optional_object(obj, key)? else {
        return Ok(None);
    };

    let time = match block.get("time") {
        Some(Value::Array(items)) => {
            let mut time: Vec<T> = Vec::with_capacity(items.len());
            for (i, v) in items.iter().enumerate() {
                let t = parse_time(v, clock, time.last())
                    .map_err(|e| at(e, &format!("{key}.time[{i}]")))?;
                time.push(t);
            }
            time
        }
        Some(other) => return Err(wrong_type(&format!("{key}.time"), "an array", other)),
        None => return Err(missing(&format!("{key}.time"))),
    };

    let mut series = BTreeMap::new();
    for (name, values) in block {
        if name == "time" {
            continue;
        }
        let Some(variable) = V::from_key(name) else {
            debug!(block = key, variable = %name, "Ignoring unknown variable");
            continue;
        };

        let field = format!("{key}.{name}");
        let values = values
            .as_array()
            .ok_or_else(|| wrong_type(&field, "an array", values))?;

        if values.len() != time.len() {
            return Err(OpenMeteoError::validation(format!(
                "field `{field}` has {} values but `{key}.time` has {}",
                values.len(),
                time.len()
            )));
        }

        let parsed = series_values(variable.kind(), values, clock).map_err(|e| at(e, &field))?;
        series.insert(variable, parsed);
    }

    Ok(Some(TimeSeries::new(time, series)))
}

fn units<V: Variable>(obj: &JsonObject, key: &str) -> Result<Option<Units<V>>> {
    let Some(block) = optional_object(obj, key)? else {
        return Ok(None);
    };

    let time = match block.get("time") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.parse::<TimeFormat>()?),
        Some(other) => return Err(wrong_type(&format!("{key}.time"), "a string", other)),
    };

    let mut values = BTreeMap::new();
    for (name, unit) in block {
        let Some(variable) = V::from_key(name) else {
            continue;
        };
        let unit = unit
            .as_str()
            .ok_or_else(|| wrong_type(&format!("{key}.{name}"), "a string", unit))?;
        values.insert(variable, unit.to_string());
    }

    Ok(Some(Units { time, values }))
}

fn series_values(kind: ValueKind, values: &[Value], clock: &Clock) -> Result<Series> {
    fn each<T>(values: &[Value], f: impl Fn(&Value) -> Result<T>) -> Result<Vec<Option<T>>> {
        values
            .iter()
            .map(|v| if v.is_null() { Ok(None) } else { f(v).map(Some) })
            .collect()
    }

    Ok(match kind {
        ValueKind::Float => Series::Float(each(values, |v| coerce_f64(v, "series value"))?),
        ValueKind::Integer => Series::Integer(each(values, |v| coerce_i64(v, "series value"))?),
        ValueKind::Timestamp => Series::Timestamp(each(values, |v| timestamp(v, clock, None))?),
    })
}

/// Turns the wall-clock times of a response into instants.
///
/// ISO timestamps are local to the response `timezone`, so the offset changes
/// across DST transitions. Zones unknown to `chrono-tz` fall back to the fixed
/// `utc_offset_seconds`.
#[derive(Debug, Clone, Copy)]
struct Clock {
    tz: Option<Tz>,
    offset: FixedOffset,
}

impl Clock {
    fn of(obj: &JsonObject, offset: FixedOffset) -> Self {
        let tz = obj
            .get("timezone")
            .and_then(Value::as_str)
            .and_then(|name| match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    debug!(timezone = name, "Unknown timezone, using fixed UTC offset");
                    None
                }
            });
        Self { tz, offset }
    }

    /// `after` is the previous point of the same axis; it picks the second
    /// occurrence of a wall-clock time repeated when clocks go back.
    fn local(
        &self,
        local: &NaiveDateTime,
        after: Option<&DateTime<FixedOffset>>,
    ) -> Option<DateTime<FixedOffset>> {
        let Some(tz) = self.tz else {
            return self.offset.from_local_datetime(local).single();
        };

        match tz.from_local_datetime(local) {
            LocalResult::Single(dt) => Some(dt.fixed_offset()),
            LocalResult::Ambiguous(earliest, latest) => {
                let earliest = earliest.fixed_offset();
                match after {
                    Some(prev) if *prev >= earliest => Some(latest.fixed_offset()),
                    _ => Some(earliest),
                }
            }
            LocalResult::None => None,
        }
    }

    fn unix(&self, secs: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::from_timestamp(secs, 0)?;
        Some(match self.tz {
            Some(tz) => utc.with_timezone(&tz).fixed_offset(),
            None => utc.with_timezone(&self.offset),
        })
    }
}

/// ISO-8601 local time (`2024-01-15T12:00`, seconds optional) or unix seconds.
fn timestamp(
    v: &Value,
    clock: &Clock,
    after: Option<&DateTime<FixedOffset>>,
) -> Result<DateTime<FixedOffset>> {
    match v {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt);
            }
            ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .and_then(|local| clock.local(&local, after))
                .ok_or_else(|| OpenMeteoError::validation(format!("invalid timestamp '{s}'")))
        }
        Value::Number(_) => {
            let secs = coerce_i64(v, "unix timestamp")?;
            clock
                .unix(secs)
                .ok_or_else(|| OpenMeteoError::validation(format!("invalid unix timestamp {secs}")))
        }
        other => Err(OpenMeteoError::validation(format!(
            "expected a timestamp, got {}",
            type_name(other)
        ))),
    }
}

/// `2024-01-15` or unix seconds of local midnight.
fn date(v: &Value, clock: &Clock, _after: Option<&NaiveDate>) -> Result<NaiveDate> {
    match v {
        Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| OpenMeteoError::validation(format!("invalid date '{s}': {e}"))),
        Value::Number(_) => timestamp(v, clock, None).map(|dt| dt.date_naive()),
        other => Err(OpenMeteoError::validation(format!(
            "expected a date, got {}",
            type_name(other)
        ))),
    }
}

fn coerce_f64(v: &Value, what: &str) -> Result<f64> {
    v.as_f64().ok_or_else(|| {
        OpenMeteoError::validation(format!("expected a number as {what}, got {}", type_name(v)))
    })
}

fn coerce_i64(v: &Value, what: &str) -> Result<i64> {
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    match v.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
        Some(f) => Err(OpenMeteoError::validation(format!(
            "expected an integer as {what}, got {f}"
        ))),
        None => Err(OpenMeteoError::validation(format!(
            "expected an integer as {what}, got {}",
            type_name(v)
        ))),
    }
}

fn optional_object<'a>(obj: &'a JsonObject, key: &str) -> Result<Option<&'a JsonObject>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(other) => Err(wrong_type(key, "an object", other)),
    }
}

fn required_f64(obj: &JsonObject, key: &str) -> Result<f64> {
    optional_f64(obj, key)?.ok_or_else(|| missing(key))
}

fn optional_f64(obj: &JsonObject, key: &str) -> Result<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => coerce_f64(v, &format!("`{key}`")).map(Some),
    }
}

fn required_i64(obj: &JsonObject, key: &str) -> Result<i64> {
    optional_i64(obj, key)?.ok_or_else(|| missing(key))
}

fn optional_i64(obj: &JsonObject, key: &str) -> Result<Option<i64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => coerce_i64(v, &format!("`{key}`")).map(Some),
    }
}

fn required_str(obj: &JsonObject, key: &str) -> Result<String> {
    optional_str(obj, key)?.ok_or_else(|| missing(key))
}

fn optional_str(obj: &JsonObject, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(key, "a string", other)),
    }
}

fn missing(field: &str) -> OpenMeteoError {
    OpenMeteoError::validation(format!("missing field `{field}`"))
}

fn wrong_type(field: &str, expected: &str, got: &Value) -> OpenMeteoError {
    OpenMeteoError::validation(format!(
        "field `{field}` must be {expected}, got {}",
        type_name(got)
    ))
}

/// Prefix a validation message with the field it came from.
fn at(err: OpenMeteoError, field: &str) -> OpenMeteoError {
    match err {
        OpenMeteoError::Validation(msg) => OpenMeteoError::validation(format!("`{field}`: {msg}")),
        other => other,
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
