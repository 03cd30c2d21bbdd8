use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Cards dated beyond this many days out (or in the past) get the sentinel.
pub const FORECAST_WINDOW_DAYS: i64 = 14;

/// Offsets 0..=7 route to the short-range source, 8..=14 to the long-range
/// one.
pub const SHORT_RANGE_MAX_DAYS: i64 = 7;

/// Minimum interval between automatic re-fetches for the same card. Amortizes
/// paid API calls across repeated card views.
pub const STALENESS_WINDOW_HOURS: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastRange {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Past date or more than fourteen days out; store the sentinel.
    OutOfWindow,
    /// A snapshot exists and is younger than the staleness window.
    StillFresh,
    Fetch(ForecastRange),
}

/// Whole days from `today` to the card's date, by local calendar day, not
/// elapsed hours.
#[must_use]
pub fn day_offset(card_date: NaiveDate, today: NaiveDate) -> i64 {
    card_date.signed_duration_since(today).num_days()
}

#[must_use]
pub fn route(offset: i64) -> Option<ForecastRange> {
    if !(0..=FORECAST_WINDOW_DAYS).contains(&offset) {
        return None;
    }
    if offset <= SHORT_RANGE_MAX_DAYS {
        Some(ForecastRange::Short)
    } else {
        Some(ForecastRange::Long)
    }
}

#[must_use]
pub fn is_stale(last_fetch: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_fetch {
        None => true,
        Some(fetched_at) => now - fetched_at >= Duration::hours(STALENESS_WINDOW_HOURS),
    }
}

/// The refresh rule, evaluated in fixed order: date window first, staleness
/// second. Reordering would attempt fetches for out-of-window dates before
/// the sentinel short-circuit.
#[must_use]
pub fn decide(
    offset: i64,
    force: bool,
    last_fetch: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> RefreshDecision {
    let Some(range) = route(offset) else {
        return RefreshDecision::OutOfWindow;
    };
    if !force && !is_stale(last_fetch, now) {
        return RefreshDecision::StillFresh;
    }
    RefreshDecision::Fetch(range)
}
