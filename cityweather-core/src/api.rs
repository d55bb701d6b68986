//! Remote API ports: the read-only requests the app makes against the
//! geocoding and weather endpoints.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::ApiError,
    model::{CurrentConditions, GeoLocation, HourlyForecast},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
pub const DEFAULT_UNITS: &str = "metric";
/// 8 steps of 3 hours: the next 24 hours.
pub const DEFAULT_FORECAST_COUNT: u32 = 8;

/// Status plus typed body. Non-2xx statuses carry no body; no error payload is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(status: u16, body: T) -> Self {
        Self { status, body: Some(body) }
    }

    pub fn failure(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait GeocodingApi: Send + Sync + Debug {
    async fn search_cities(
        &self,
        query: &str,
        limit: u32,
        api_key: &str,
    ) -> Result<ApiResponse<Vec<GeoLocation>>, ApiError>;
}

#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
        api_key: &str,
        units: &str,
    ) -> Result<ApiResponse<CurrentConditions>, ApiError>;

    async fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
        api_key: &str,
        units: &str,
        cnt: u32,
    ) -> Result<ApiResponse<HourlyForecast>, ApiError>;
}
