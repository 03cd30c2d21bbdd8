pub mod day_summary;
pub mod forecast;
pub mod geocode;
