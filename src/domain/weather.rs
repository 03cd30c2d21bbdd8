use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Forecast text of the sentinel snapshot meaning "not applicable".
pub const NO_WEATHER: &str = "No Weather";

/// Forecast text used by the day-summary source, which carries no description.
pub const FORECAST_UNAVAILABLE: &str = "Forecast unavailable";

/// Last-resort forecast text when a daily entry has no usable description.
pub const FORECAST_FALLBACK: &str = "Forecast";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    Celsius,
    Fahrenheit,
}

impl Units {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Units::Celsius => "\u{b0}C",
            Units::Fahrenheit => "\u{b0}F",
        }
    }
}

/// Snapshots store Celsius; conversion happens only at render time.
#[must_use]
pub fn convert_temp(celsius: f64, units: Units) -> f64 {
    match units {
        Units::Celsius => celsius,
        Units::Fahrenheit => celsius * 1.8 + 32.0,
    }
}

#[must_use]
pub fn round_temp(value: f64) -> i64 {
    value.round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherSource {
    ShortRange,
    LongRange,
    Manual,
    None,
}

impl fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            WeatherSource::ShortRange => "short-range",
            WeatherSource::LongRange => "long-range",
            WeatherSource::Manual => "manual",
            WeatherSource::None => "none",
        };
        f.write_str(tag)
    }
}

/// One forecast fetch for a card. Replaced wholesale on every refresh, never
/// merged field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub high_c: Option<f64>,
    pub low_c: Option<f64>,
    pub forecast: Option<String>,
    /// 0..1 when the upstream provides it.
    pub rain_chance: Option<f64>,
    /// 0..1 when the upstream provides it.
    pub snow_chance: Option<f64>,
    pub updated_at: DateTime<Utc>,
    pub source: WeatherSource,
}

impl WeatherSnapshot {
    /// The well-defined "not applicable" value, distinct from an error.
    #[must_use]
    pub fn no_weather() -> Self {
        Self {
            high_c: None,
            low_c: None,
            forecast: Some(NO_WEATHER.to_string()),
            rain_chance: None,
            snow_chance: None,
            updated_at: Utc::now(),
            source: WeatherSource::None,
        }
    }

    #[must_use]
    pub fn is_no_weather(&self) -> bool {
        self.source == WeatherSource::None || self.forecast.as_deref() == Some(NO_WEATHER)
    }

    /// Encodes for the opaque-blob storage used by the host application.
    #[must_use]
    pub fn encode(&self) -> Option<Vec<u8>> {
        serde_json::to_vec(self).ok()
    }

    #[must_use]
    pub fn decode(data: &[u8]) -> Option<Self> {
        serde_json::from_slice(data).ok()
    }
}
