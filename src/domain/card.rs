use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::weather::WeatherSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(Uuid);

impl CardId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// One dated trip stop. Owns at most one weather snapshot at a time plus the
/// manual-override fields entered by the user for past dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Day granularity in the user's local calendar; no time-of-day semantics.
    pub date: NaiveDate,
    pub location_name: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub weather: Option<WeatherSnapshot>,

    // Manual overrides, meaningful only while the card's date is in the past.
    pub manual_high_c: Option<f64>,
    pub manual_low_c: Option<f64>,
    pub manual_forecast: Option<String>,
}

impl Card {
    #[must_use]
    pub fn new(date: NaiveDate, location_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            created_at: now,
            updated_at: now,
            date,
            location_name: location_name.into(),
            latitude: None,
            longitude: None,
            weather: None,
            manual_high_c: None,
            manual_low_c: None,
            manual_forecast: None,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.latitude = Some(coordinate.latitude);
        self.longitude = Some(coordinate.longitude);
    }

    /// True when all three override fields are present and the text is
    /// non-blank. Whether they apply at all depends on the card's date; see
    /// [`crate::domain::effective::effective_weather`].
    #[must_use]
    pub fn has_manual_weather(&self) -> bool {
        self.manual_high_c.is_some()
            && self.manual_low_c.is_some()
            && self
                .manual_forecast
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }

    pub fn touch_updated(&mut self) {
        self.updated_at = Utc::now();
    }
}
