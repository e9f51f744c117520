use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset};
use open_meteo_core::{
    DailyVariable, Forecast, ForecastRequest, GeocodingRequest, HourlyVariable, OpenMeteo,
    WeatherApi,
};
use tracing::info;

/// How many hourly rows to print.
const HOURS_SHOWN: usize = 6;

pub async fn run(place: &str) -> Result<()> {
    let mut client = OpenMeteo::with_defaults().context("Failed to create Open-Meteo client")?;

    let outcome = show(&client, place).await;
    client.close();
    outcome
}

async fn show(api: &dyn WeatherApi, place: &str) -> Result<()> {
    let search = api
        .geocoding(&GeocodingRequest::new(place))
        .await
        .with_context(|| format!("Failed to look up '{place}'"))?;

    let location = search
        .results
        .first()
        .ok_or_else(|| anyhow!("No location found for '{place}'"))?;

    info!(
        name = %location.name,
        country = %location.country,
        lat = location.latitude,
        lon = location.longitude,
        "Resolved location"
    );

    let request = ForecastRequest::new(location.latitude, location.longitude)
        .with_timezone(location.timezone.clone())
        .with_current_weather()
        .with_hourly([HourlyVariable::Temperature2m, HourlyVariable::RelativeHumidity2m])
        .with_daily([DailyVariable::Sunrise, DailyVariable::Sunset]);

    let forecast = api
        .forecast(&request)
        .await
        .with_context(|| format!("Failed to fetch forecast for '{}'", location.name))?;

    println!("{}, {}", location.name, location.country);
    print_forecast(&forecast);

    Ok(())
}

fn print_forecast(forecast: &Forecast) {
    if let Some(current) = &forecast.current_weather {
        println!(
            "Now ({}): {:.1}°, wind {:.1} from {}°, WMO code {}",
            hm(&current.time),
            current.temperature,
            current.wind_speed,
            current.wind_direction,
            current.weather_code
        );
    }

    if let Some(hourly) = &forecast.hourly {
        let unit = |v| {
            forecast
                .hourly_units
                .as_ref()
                .and_then(|u| u.get(v))
                .unwrap_or_default()
                .to_string()
        };
        let temp_unit = unit(HourlyVariable::Temperature2m);
        let humidity_unit = unit(HourlyVariable::RelativeHumidity2m);

        let temperature = hourly.floats(HourlyVariable::Temperature2m);
        let humidity = hourly.integers(HourlyVariable::RelativeHumidity2m);

        for (i, time) in hourly.time.iter().enumerate().take(HOURS_SHOWN) {
            println!(
                "  {}  {:>6}{temp_unit}  {:>4}{humidity_unit}",
                hm(time),
                show_value(temperature.get(i).copied().flatten()),
                show_value(humidity.get(i).copied().flatten()),
            );
        }
    }

    if let Some(daily) = &forecast.daily {
        let sunrise = daily.timestamps(DailyVariable::Sunrise);
        let sunset = daily.timestamps(DailyVariable::Sunset);

        for (i, day) in daily.time.iter().enumerate() {
            let at = |series: &[Option<DateTime<FixedOffset>>]| {
                series
                    .get(i)
                    .copied()
                    .flatten()
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            println!("  {day}  sunrise {}  sunset {}", at(sunrise), at(sunset));
        }
    }
}

fn hm(time: &DateTime<FixedOffset>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

fn show_value<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
