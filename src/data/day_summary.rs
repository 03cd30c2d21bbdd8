use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::domain::card::Coordinate;
use crate::domain::weather::{FORECAST_UNAVAILABLE, WeatherSnapshot, WeatherSource};
use crate::error::{FetchError, Upstream};

const DAY_SUMMARY_URL: &str = "https://api.openweathermap.org/data/3.0/onecall/day_summary";

/// Long-range source: per-date summary, valid for cards dated eight through
/// fourteen days out. The endpoint carries temperatures only, so the snapshot
/// gets a fixed placeholder text and no precipitation fields.
#[derive(Debug, Clone)]
pub struct DaySummaryClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DaySummaryClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DAY_SUMMARY_URL, api_key)
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

    /// Fetches the summary for the exact calendar date.
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
                Upstream::LongRange,
                "missing API key",
            ));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|err| FetchError::unavailable(Upstream::LongRange, err.to_string()))?
            .error_for_status()
            .map_err(|err| FetchError::unavailable(Upstream::LongRange, err.to_string()))?;

        let payload: DaySummaryResponse = response
            .json()
            .await
            .map_err(|err| FetchError::from_reqwest(Upstream::LongRange, err))?;

        Ok(WeatherSnapshot {
            high_c: payload.temperature.max,
            low_c: payload.temperature.min,
            forecast: Some(FORECAST_UNAVAILABLE.to_string()),
            rain_chance: None,
            snow_chance: None,
            updated_at: Utc::now(),
            source: WeatherSource::LongRange,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DaySummaryResponse {
    temperature: TempRange,
}

#[derive(Debug, Deserialize)]
struct TempRange {
    min: Option<f64>,
    max: Option<f64>,
}
