use chrono::{Local, NaiveDate};

use crate::domain::card::Card;
use crate::domain::weather::{NO_WEATHER, Units, WeatherSource, convert_temp, round_temp};

/// Weather as a view or export surface should show it: temperatures already
/// converted to the requested unit, text resolved against the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayWeather {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub forecast: String,
    pub rain_chance: Option<f64>,
    pub snow_chance: Option<f64>,
    pub source: WeatherSource,
}

impl DisplayWeather {
    fn no_weather() -> Self {
        Self {
            high: None,
            low: None,
            forecast: NO_WEATHER.to_string(),
            rain_chance: None,
            snow_chance: None,
            source: WeatherSource::None,
        }
    }

    /// One-line rendering shared by the compact badge and the CSV cell,
    /// whole-degree rounding.
    #[must_use]
    pub fn summary_line(&self, units: Units) -> String {
        match (self.high, self.low) {
            (Some(high), Some(low)) => format!(
                "H {}{unit}  L {}{unit}  {}",
                round_temp(high),
                round_temp(low),
                self.forecast,
                unit = units.label(),
            ),
            _ => self.forecast.clone(),
        }
    }
}

/// Resolves what a card should display: manual overrides win for past dates,
/// cached snapshots cover the rest. Every rendering and export path goes
/// through here so the past/future policy cannot diverge between views.
#[must_use]
pub fn effective_weather(card: &Card, units: Units) -> DisplayWeather {
    effective_weather_on(card, units, Local::now().date_naive())
}

/// Same as [`effective_weather`] with the reference day passed explicitly.
#[must_use]
pub fn effective_weather_on(card: &Card, units: Units, today: NaiveDate) -> DisplayWeather {
    if card.date < today && card.has_manual_weather() {
        return DisplayWeather {
            high: card.manual_high_c.map(|c| convert_temp(c, units)),
            low: card.manual_low_c.map(|c| convert_temp(c, units)),
            forecast: card.manual_forecast.clone().unwrap_or_default(),
            rain_chance: None,
            snow_chance: None,
            source: WeatherSource::Manual,
        };
    }

    match &card.weather {
        Some(snapshot) if !snapshot.is_no_weather() => DisplayWeather {
            high: snapshot.high_c.map(|c| convert_temp(c, units)),
            low: snapshot.low_c.map(|c| convert_temp(c, units)),
            forecast: snapshot.forecast.clone().unwrap_or_default(),
            rain_chance: snapshot.rain_chance,
            snow_chance: snapshot.snow_chance,
            source: snapshot.source,
        },
        _ => DisplayWeather::no_weather(),
    }
}
