use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::domain::card::Coordinate;
use crate::domain::weather::{FORECAST_FALLBACK, WeatherSnapshot, WeatherSource};
use crate::error::{FetchError, Upstream};

const FORECAST_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

/// Upstream day boundaries may not align with local midnight, so the target
/// day is matched by nearest timestamp. Entries farther out than this are
/// treated as absent rather than silently showing another day's weather.
const MAX_DAY_DISTANCE_SECS: i64 = 36 * 3600;

/// Short-range source: multi-day daily forecast, valid for cards dated today
/// through seven days out.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ForecastClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(FORECAST_URL, api_key)
    }

    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetches the daily list and reduces it to a snapshot for `date`.
    ///
    /// # Errors
    /// `UpstreamUnavailable` on transport failures or non-2xx status,
    /// `MalformedResponse` when the body does not decode.
    pub async fn fetch(
        &self,
        date: NaiveDate,
        coordinate: Coordinate,
    ) -> Result<WeatherSnapshot, FetchError> {
        if self.api_key.trim().is_empty() {
            return Err(FetchError::unavailable(
                Upstream::ShortRange,
                "missing API key",
            ));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("exclude", "minutely,hourly,alerts,current".to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|err| FetchError::unavailable(Upstream::ShortRange, err.to_string()))?
            .error_for_status()
            .map_err(|err| FetchError::unavailable(Upstream::ShortRange, err.to_string()))?;

        let payload: OneCallResponse = response
            .json()
            .await
            .map_err(|err| FetchError::from_reqwest(Upstream::ShortRange, err))?;

        Ok(snapshot_for_day(&payload.daily, date))
    }
}

/// Picks the daily entry nearest to the local start of the target day. An
/// empty list or a too-distant match yields the sentinel, not an error.
fn snapshot_for_day(entries: &[DailyEntry], date: NaiveDate) -> WeatherSnapshot {
    let day_start = local_day_start(date);

    let mut best: Option<(&DailyEntry, i64)> = None;
    for entry in entries {
        let Some(timestamp) = DateTime::from_timestamp(entry.dt, 0) else {
            continue;
        };
        let distance = (timestamp - day_start).num_seconds().abs();
        if best.is_none_or(|(_, nearest)| distance < nearest) {
            best = Some((entry, distance));
        }
    }

    let Some((entry, distance)) = best else {
        return WeatherSnapshot::no_weather();
    };
    if distance > MAX_DAY_DISTANCE_SECS {
        return WeatherSnapshot::no_weather();
    }

    let forecast = entry
        .weather
        .first()
        .and_then(|w| w.main.clone().or_else(|| w.description.clone()))
        .unwrap_or_else(|| FORECAST_FALLBACK.to_string());

    WeatherSnapshot {
        high_c: entry.temp.max,
        low_c: entry.temp.min,
        forecast: Some(forecast),
        rain_chance: entry.pop,
        snow_chance: None,
        updated_at: Utc::now(),
        source: WeatherSource::ShortRange,
    }
}

fn local_day_start(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    daily: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    dt: i64,
    temp: TempRange,
    #[serde(default)]
    weather: Vec<WeatherTag>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TempRange {
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherTag {
    main: Option<String>,
    description: Option<String>,
}
