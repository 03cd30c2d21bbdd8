//! Weather refresh engine for a trip journal: decides whether and how to
//! fetch a forecast for each dated card, resolves between short- and
//! long-range upstream sources, and reconciles cached snapshots with manual
//! overrides for past dates.

pub mod data;
pub mod domain;
pub mod error;
pub mod refresh;
pub mod store;

pub use data::day_summary::DaySummaryClient;
pub use data::forecast::ForecastClient;
pub use data::geocode::GeocodeClient;
pub use domain::card::{Card, CardId, Coordinate};
pub use domain::effective::{DisplayWeather, effective_weather, effective_weather_on};
pub use domain::weather::{Units, WeatherSnapshot, WeatherSource};
pub use error::{FetchError, Upstream};
pub use refresh::engine::{RefreshEngine, WeatherServices};
pub use store::{CardStore, MemoryStore};
