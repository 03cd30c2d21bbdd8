#![allow(dead_code)]

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone};
use serde_json::{Value, json};
use trip_weather::{
    Card, DaySummaryClient, ForecastClient, GeocodeClient, RefreshEngine, WeatherServices,
};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-key";

pub fn date_from_today(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

pub fn card_dated(days_from_today: i64, location: &str) -> Card {
    Card::new(date_from_today(days_from_today), location)
}

pub fn card_with_coords(days_from_today: i64, location: &str) -> Card {
    let mut card = card_dated(days_from_today, location);
    card.latitude = Some(59.3293);
    card.longitude = Some(18.0686);
    card
}

/// Engine wired against one mock server, with each upstream on its own path.
pub fn engine_for(server: &MockServer) -> RefreshEngine {
    RefreshEngine::new(WeatherServices {
        geocoder: GeocodeClient::with_base_url(format!("{}/geocode", server.uri())),
        short_range: ForecastClient::with_base_url(
            format!("{}/onecall", server.uri()),
            TEST_API_KEY,
        ),
        long_range: DaySummaryClient::with_base_url(
            format!("{}/day_summary", server.uri()),
            TEST_API_KEY,
        ),
    })
}

pub fn local_noon_timestamp(date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"));
    Local
        .from_local_datetime(&naive)
        .earliest()
        .expect("unambiguous local noon")
        .timestamp()
}

pub fn daily_entry(date: NaiveDate, max: f64, min: f64, main: &str, pop: f64) -> Value {
    json!({
        "dt": local_noon_timestamp(date),
        "temp": { "min": min, "max": max },
        "weather": [{ "main": main, "description": "longer upstream text" }],
        "pop": pop,
    })
}

/// Five consecutive days starting today; today's entry is "Clouds" 20/10.
pub fn five_day_payload() -> Value {
    let mains = ["Clouds", "Rain", "Clear", "Clouds", "Clear"];
    let daily: Vec<Value> = (0..5)
        .map(|idx| {
            daily_entry(
                date_from_today(idx),
                20.0 + idx as f64,
                10.0 + idx as f64,
                mains[idx as usize],
                0.1 * idx as f64,
            )
        })
        .collect();
    json!({ "daily": daily })
}

pub fn single_day_payload(date: NaiveDate, max: f64, min: f64, main: &str) -> Value {
    json!({ "daily": [daily_entry(date, max, min, main, 0.0)] })
}

pub fn day_summary_payload(max: f64, min: f64) -> Value {
    json!({ "temperature": { "min": min, "max": max } })
}

pub fn geocode_payload(lat: f64, lon: f64) -> Value {
    json!({
        "results": [{
            "id": 1,
            "name": "Paris",
            "latitude": lat,
            "longitude": lon,
            "country": "France",
        }]
    })
}

pub fn geocode_empty_payload() -> Value {
    json!({ "results": [] })
}
