//! Display values derived from fetched weather. Everything here is pure; the
//! only randomness comes in through the caller's RNG.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use rand::Rng;

use crate::model::{CurrentConditions, HourlyForecast, MainReadings};

const KELVIN_OFFSET: f64 = 273.15;
const MPS_TO_KMH: f64 = 3.6;
/// Number of forecast steps summarised on the home view.
pub const HOURLY_PREVIEW_LEN: usize = 4;

pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - KELVIN_OFFSET).floor() as i64
}

pub fn formatted_temperature(kelvin: f64) -> String {
    format!("{}°", kelvin_to_celsius(kelvin))
}

pub fn formatted_min_max(main: &MainReadings) -> String {
    format!(
        "Max: {}°  Min: {}°",
        kelvin_to_celsius(main.temp_max),
        kelvin_to_celsius(main.temp_min)
    )
}

/// m/s to km/h, truncated.
pub fn formatted_wind_speed(speed_mps: f64) -> String {
    format!("{} km/h", (speed_mps * MPS_TO_KMH).trunc() as i64)
}

pub fn formatted_humidity(humidity: i32) -> String {
    format!("{humidity}%")
}

/// Meters to whole kilometers.
pub fn formatted_visibility(meters: i32) -> String {
    (meters / 1000).to_string()
}

/// First condition's description with its first letter uppercased.
pub fn capitalized_description(current: &CurrentConditions) -> String {
    let Some(condition) = current.weather.first() else {
        return String::new();
    };

    let mut chars = condition.description.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `HH:MM` of the first forecast steps, in the city's own UTC offset.
pub fn hourly_forecast_times(forecast: &HourlyForecast) -> Vec<String> {
    let offset = FixedOffset::east_opt(forecast.city.timezone)
        .unwrap_or(Utc.fix());

    forecast
        .list
        .iter()
        .take(HOURLY_PREVIEW_LEN)
        .map(|item| match DateTime::from_timestamp(item.dt, 0) {
            Some(utc) => utc.with_timezone(&offset).format("%H:%M").to_string(),
            None => String::new(),
        })
        .collect()
}

pub fn hourly_forecast_temperatures(forecast: &HourlyForecast) -> Vec<String> {
    forecast
        .list
        .iter()
        .take(HOURLY_PREVIEW_LEN)
        .map(|item| format!("{}°C", kelvin_to_celsius(item.main.temp)))
        .collect()
}

/// Mean probability of precipitation over the first forecast steps, as a
/// truncated percentage. `None` when the forecast has no steps.
pub fn real_precipitation_percentage(forecast: &HourlyForecast) -> Option<String> {
    let pops: Vec<f64> = forecast.list.iter().take(HOURLY_PREVIEW_LEN).map(|i| i.pop).collect();
    if pops.is_empty() {
        return None;
    }

    let mean = pops.iter().sum::<f64>() / pops.len() as f64;
    Some(format!("{}%", (mean * 100.0).trunc() as i64))
}

/// Rough precipitation chance from cloud cover, used only when no forecast is
/// available. This is an approximation, not a forecast.
pub fn estimated_precipitation_percentage<R: Rng + ?Sized>(cloud_cover: i32, rng: &mut R) -> String {
    let pct = if cloud_cover >= 80 {
        rng.random_range(20..=40)
    } else if cloud_cover >= 50 {
        rng.random_range(5..=20)
    } else {
        rng.random_range(0..=5)
    };

    format!("{pct}%")
}

pub fn formatted_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%b %d, %Y").to_string()
}

pub fn formatted_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M").to_string()
}
