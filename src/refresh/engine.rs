use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::data::day_summary::DaySummaryClient;
use crate::data::forecast::ForecastClient;
use crate::data::geocode::GeocodeClient;
use crate::domain::card::{Card, CardId, Coordinate};
use crate::domain::weather::WeatherSnapshot;
use crate::error::FetchError;
use crate::refresh::policy::{self, ForecastRange, RefreshDecision};
use crate::store::CardStore;

/// The upstream clients the engine depends on, injected explicitly so hosts
/// and tests control endpoints and keys. No process-wide singleton.
#[derive(Debug, Clone)]
pub struct WeatherServices {
    pub geocoder: GeocodeClient,
    pub short_range: ForecastClient,
    pub long_range: DaySummaryClient,
}

impl WeatherServices {
    /// Production wiring: default endpoints, one shared forecast API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        Self {
            geocoder: GeocodeClient::new(),
            short_range: ForecastClient::new(key.clone()),
            long_range: DaySummaryClient::new(key),
        }
    }
}

/// Decides whether and how to fetch weather for a card: date window, then
/// staleness, then coordinate resolution, then source dispatch. The sole
/// refresh entry point for UI and import flows.
#[derive(Debug)]
pub struct RefreshEngine {
    services: WeatherServices,
    // Per-card serialization: concurrent triggers for the same card join the
    // same lock, and the staleness check turns the later ones into no-ops.
    in_flight: Mutex<HashMap<CardId, Arc<Mutex<()>>>>,
}

impl RefreshEngine {
    #[must_use]
    pub fn new(services: WeatherServices) -> Self {
        Self {
            services,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the card, applies the refresh rule, and persists the result.
    /// A successfully geocoded coordinate is persisted even when the
    /// subsequent forecast call fails; the weather fields are only ever
    /// replaced by a completed fetch. Unknown ids are a no-op: a card deleted
    /// while a refresh was queued must not fail the queue.
    ///
    /// The engine owns only the weather and coordinate fields. The fetch can
    /// suspend for seconds, so the write-back re-reads the card and applies
    /// just those fields; edits the host stored in the meantime (manual
    /// values, location, date) survive, and a card deleted mid-fetch stays
    /// deleted.
    ///
    /// # Errors
    /// Propagates geocode and forecast failures unmodified; never retries.
    pub async fn refresh_if_needed(
        &self,
        store: &dyn CardStore,
        id: CardId,
        force: bool,
    ) -> Result<(), FetchError> {
        let guard = self.card_guard(id).await;
        let result = {
            let _serialized = guard.lock().await;
            match store.get(id) {
                Some(mut card) => {
                    let result = self.refresh_card(&mut card, force).await;
                    match store.get(id) {
                        Some(mut current) => {
                            current.weather = card.weather.take();
                            current.latitude = card.latitude;
                            current.longitude = card.longitude;
                            current.updated_at = current.updated_at.max(card.updated_at);
                            store.put(current);
                        }
                        None => {
                            debug!(card = %id, "card deleted during refresh");
                        }
                    }
                    result
                }
                None => {
                    debug!(card = %id, "refresh requested for unknown card");
                    Ok(())
                }
            }
        };
        self.release_guard(id, &guard).await;
        result
    }

    /// The store-free policy core, operating on a card in place. Steps run in
    /// fixed order: date window, staleness, coordinate, dispatch, store.
    ///
    /// # Errors
    /// Same as [`Self::refresh_if_needed`].
    pub async fn refresh_card(&self, card: &mut Card, force: bool) -> Result<(), FetchError> {
        let today = Local::now().date_naive();
        let offset = policy::day_offset(card.date, today);
        let last_fetch = card.weather.as_ref().map(|snap| snap.updated_at);

        match policy::decide(offset, force, last_fetch, Utc::now()) {
            RefreshDecision::OutOfWindow => {
                debug!(card = %card.id, offset, "date outside forecast window");
                card.weather = Some(WeatherSnapshot::no_weather());
                card.touch_updated();
                Ok(())
            }
            RefreshDecision::StillFresh => {
                debug!(card = %card.id, "snapshot younger than staleness window");
                Ok(())
            }
            RefreshDecision::Fetch(range) => self.fetch_and_store(card, range).await,
        }
    }

    /// Bulk path for itinerary import and list appearance: strictly
    /// sequential to bound concurrent upstream calls, one stop's failure
    /// never aborts the batch. Returns the number of cards refreshed without
    /// error.
    pub async fn refresh_all(&self, store: &dyn CardStore, ids: &[CardId], force: bool) -> usize {
        let mut refreshed = 0;
        for &id in ids {
            match self.refresh_if_needed(store, id, force).await {
                Ok(()) => refreshed += 1,
                Err(FetchError::Cancelled) => {
                    debug!(card = %id, "weather refresh cancelled");
                }
                Err(err) => {
                    warn!(card = %id, error = %err, "weather refresh failed");
                }
            }
        }
        refreshed
    }

    async fn fetch_and_store(
        &self,
        card: &mut Card,
        range: ForecastRange,
    ) -> Result<(), FetchError> {
        let Some(coordinate) = self.resolve_coordinate(card).await? else {
            card.weather = Some(WeatherSnapshot::no_weather());
            card.touch_updated();
            return Ok(());
        };

        let snapshot = match range {
            ForecastRange::Short => self.services.short_range.fetch(card.date, coordinate).await?,
            ForecastRange::Long => self.services.long_range.fetch(card.date, coordinate).await?,
        };

        debug!(card = %card.id, source = %snapshot.source, "stored weather snapshot");
        card.weather = Some(snapshot);
        card.touch_updated();
        Ok(())
    }

    /// `Ok(None)` means the card has neither a coordinate nor a usable
    /// location name. An unresolvable name also writes the sentinel, since
    /// no forecast can ever apply until the card is edited.
    async fn resolve_coordinate(&self, card: &mut Card) -> Result<Option<Coordinate>, FetchError> {
        if let Some(coordinate) = card.coordinate() {
            return Ok(Some(coordinate));
        }

        let name = card.location_name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        match self.services.geocoder.resolve(name).await {
            Ok(coordinate) => {
                card.set_coordinate(coordinate);
                card.touch_updated();
                Ok(Some(coordinate))
            }
            Err(err @ FetchError::GeocodeNotFound(_)) => {
                card.weather = Some(WeatherSnapshot::no_weather());
                card.touch_updated();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn card_guard(&self, id: CardId) -> Arc<Mutex<()>> {
        let mut map = self.in_flight.lock().await;
        // A caller dropped mid-fetch never reaches release_guard; its entry
        // is the only remaining reference, so sweep those here.
        map.retain(|_, guard| Arc::strong_count(guard) > 1);
        map.entry(id).or_default().clone()
    }

    async fn release_guard(&self, id: CardId, guard: &Arc<Mutex<()>>) {
        let mut map = self.in_flight.lock().await;
        // Map entry plus our clone; nobody else is waiting on this card.
        if Arc::strong_count(guard) <= 2 {
            map.remove(&id);
        }
    }
}
