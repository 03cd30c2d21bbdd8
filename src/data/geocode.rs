use reqwest::Client;
use serde::Deserialize;

use crate::domain::card::Coordinate;
use crate::error::{FetchError, Upstream};

const GEOCODE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Forward geocoder: free-text place name to a coordinate. Consumed by the
/// refresh engine only when a card has no stored coordinate.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodeClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(GEOCODE_URL)
    }

    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }

    /// Resolves `name` to the best matching coordinate.
    ///
    /// # Errors
    /// `GeocodeNotFound` for blank input or an empty result set,
    /// `UpstreamUnavailable`/`MalformedResponse` for transport and decode
    /// failures.
    pub async fn resolve(&self, name: &str) -> Result<Coordinate, FetchError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(FetchError::GeocodeNotFound(name.to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", trimmed),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|err| FetchError::unavailable(Upstream::Geocoder, err.to_string()))?
            .error_for_status()
            .map_err(|err| FetchError::unavailable(Upstream::Geocoder, err.to_string()))?;

        let payload: GeocodeResponse = response
            .json()
            .await
            .map_err(|err| FetchError::from_reqwest(Upstream::Geocoder, err))?;

        payload
            .results
            .unwrap_or_default()
            .first()
            .map(|result| Coordinate {
                latitude: result.latitude,
                longitude: result.longitude,
            })
            .ok_or_else(|| FetchError::GeocodeNotFound(trimmed.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    latitude: f64,
    longitude: f64,
}
