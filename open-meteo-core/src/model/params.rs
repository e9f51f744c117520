//! Query-side vocabulary: unit systems, time formats and the variables a
//! forecast block can carry.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::OpenMeteoError;

/// How the values of one variable are typed in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Integer,
    Timestamp,
}

/// A variable that can be requested for a time-series block.
pub trait Variable: Copy + Ord + fmt::Debug + 'static {
    /// Name used in the query string and as the JSON key of the series.
    fn as_str(&self) -> &'static str;

    fn kind(&self) -> ValueKind;

    fn all() -> &'static [Self];

    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.as_str() == key)
    }
}

/// Declares a unit-like enum whose members map one-to-one onto query values.
macro_rules! query_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $value)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub const fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = OpenMeteoError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $name::all()
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == value)
                    .ok_or_else(|| {
                        OpenMeteoError::validation(format!(
                            concat!("Unknown ", stringify!($name), " '{}'"),
                            value
                        ))
                    })
            }
        }
    };
}

/// Declares a block variable enum: query name plus the kind of its series.
macro_rules! variable_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => ($key:literal, $kind:ident)),+ $(,)? }
    ) => {
        query_enum! {
            $(#[$meta])*
            $name { $($(#[$vmeta])* $variant => $key),+ }
        }

        impl Variable for $name {
            fn as_str(&self) -> &'static str {
                $name::as_str(self)
            }

            fn kind(&self) -> ValueKind {
                match self {
                    $($name::$variant => ValueKind::$kind),+
                }
            }

            fn all() -> &'static [Self] {
                $name::all()
            }
        }
    };
}

query_enum! {
    TemperatureUnit {
        Celsius => "celsius",
        Fahrenheit => "fahrenheit",
    }
}

query_enum! {
    WindSpeedUnit {
        KilometersPerHour => "kmh",
        Knots => "kn",
        MetersPerSecond => "ms",
        MilesPerHour => "mph",
    }
}

query_enum! {
    PrecipitationUnit {
        Millimeters => "mm",
        Inches => "inch",
    }
}

query_enum! {
    /// Encoding of timestamps in the response.
    TimeFormat {
        Iso8601 => "iso8601",
        UnixTime => "unixtime",
    }
}

variable_enum! {
    HourlyVariable {
        /// Perceived temperature combining wind chill, humidity and radiation.
        ApparentTemperature => ("apparent_temperature", Float),
        /// Total cloud cover as an area fraction.
        CloudCover => ("cloudcover", Integer),
        /// High level clouds from 8 km altitude.
        CloudCoverHigh => ("cloudcover_high", Integer),
        /// Low level clouds and fog up to 3 km altitude.
        CloudCoverLow => ("cloudcover_low", Integer),
        /// Mid level clouds from 3 to 8 km altitude.
        CloudCoverMid => ("cloudcover_mid", Integer),
        DewPoint2m => ("dewpoint_2m", Float),
        DiffuseRadiation => ("diffuse_radiation", Float),
        DirectNormalIrradiance => ("direct_normal_irradiance", Float),
        DirectRadiation => ("direct_radiation", Float),
        Evapotranspiration => ("evapotranspiration", Float),
        /// Altitude above sea level of the 0°C level.
        FreezingLevelHeight => ("freezinglevel_height", Float),
        /// Rain, showers and snow summed over the preceding hour.
        Precipitation => ("precipitation", Float),
        /// Air pressure reduced to mean sea level.
        PressureMsl => ("pressure_msl", Float),
        RelativeHumidity2m => ("relativehumidity_2m", Integer),
        ShortwaveRadiation => ("shortwave_radiation", Float),
        SnowDepth => ("snow_depth", Float),
        SoilMoisture0To1cm => ("soil_moisture_0_1cm", Float),
        SoilMoisture1To3cm => ("soil_moisture_1_3cm", Float),
        SoilMoisture3To9cm => ("soil_moisture_3_9cm", Float),
        SoilMoisture9To27cm => ("soil_moisture_9_27cm", Float),
        SoilMoisture27To81cm => ("soil_moisture_27_81cm", Float),
        SoilTemperature0cm => ("soil_temperature_0cm", Float),
        SoilTemperature6cm => ("soil_temperature_6cm", Float),
        SoilTemperature18cm => ("soil_temperature_18cm", Float),
        SoilTemperature54cm => ("soil_temperature_54cm", Float),
        Temperature2m => ("temperature_2m", Float),
        VaporPressureDeficit => ("vapor_pressure_deficit", Float),
        /// WMO weather interpretation code.
        WeatherCode => ("weathercode", Integer),
        WindDirection10m => ("winddirection_10m", Integer),
        WindDirection80m => ("winddirection_80m", Integer),
        WindDirection120m => ("winddirection_120m", Integer),
        WindDirection180m => ("winddirection_180m", Integer),
        /// Maximum gust at 10 m over the preceding hour.
        WindGusts10m => ("windgusts_10m", Float),
        WindSpeed10m => ("windspeed_10m", Float),
        WindSpeed80m => ("windspeed_80m", Float),
        WindSpeed120m => ("windspeed_120m", Float),
        WindSpeed180m => ("windspeed_180m", Float),
    }
}

variable_enum! {
    DailyVariable {
        ApparentTemperatureMax => ("apparent_temperature_max", Float),
        ApparentTemperatureMin => ("apparent_temperature_min", Float),
        /// Number of hours with rain.
        PrecipitationHours => ("precipitation_hours", Float),
        PrecipitationSum => ("precipitation_sum", Float),
        /// Solar radiation summed over the day, in MJ/m².
        ShortwaveRadiationSum => ("shortwave_radiation_sum", Float),
        Sunrise => ("sunrise", Timestamp),
        Sunset => ("sunset", Timestamp),
        Temperature2mMax => ("temperature_2m_max", Float),
        Temperature2mMin => ("temperature_2m_min", Float),
        /// Most severe WMO weather code of the day.
        WeatherCode => ("weathercode", Integer),
        WindDirection10mDominant => ("winddirection_10m_dominant", Integer),
        WindGusts10mMax => ("windgusts_10m_max", Float),
        WindSpeed10mMax => ("windspeed_10m_max", Float),
    }
}
