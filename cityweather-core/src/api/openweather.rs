use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    error::ApiError,
    model::{CurrentConditions, GeoLocation, HourlyForecast},
};

use super::{ApiResponse, GeocodingApi, WeatherApi};

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the OpenWeather geocoding and weather endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    geocoding_base_url: String,
    weather_base_url: String,
}

impl OpenWeatherClient {
    pub fn new(
        geocoding_base_url: impl Into<String>,
        weather_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport { endpoint: "client", source })?;

        Ok(Self {
            http,
            geocoding_base_url: geocoding_base_url.into(),
            weather_base_url: weather_base_url.into(),
        })
    }

    pub fn with_defaults() -> Result<Self, ApiError> {
        Self::new(DEFAULT_GEOCODING_BASE_URL, DEFAULT_WEATHER_BASE_URL, DEFAULT_TIMEOUT)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, ApiError> {
        // The query carries the credential; only the bare URL is logged.
        tracing::debug!(endpoint, %url, "sending request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source: source.without_url() })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source: source.without_url() })?;

        if !status.is_success() {
            tracing::debug!(
                endpoint,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "request returned non-success status"
            );
            return Ok(ApiResponse::failure(status.as_u16()));
        }

        let parsed: T =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })?;

        Ok(ApiResponse::success(status.as_u16(), parsed))
    }
}

#[async_trait]
impl GeocodingApi for OpenWeatherClient {
    async fn search_cities(
        &self,
        query: &str,
        limit: u32,
        api_key: &str,
    ) -> Result<ApiResponse<Vec<GeoLocation>>, ApiError> {
        let url = join_url(&self.geocoding_base_url, "direct");

        self.get_json(
            "geocoding",
            url,
            &[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", api_key.to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
        api_key: &str,
        units: &str,
    ) -> Result<ApiResponse<CurrentConditions>, ApiError> {
        let url = join_url(&self.weather_base_url, "weather");

        self.get_json(
            "current weather",
            url,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", units.to_string()),
            ],
        )
        .await
    }

    async fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
        api_key: &str,
        units: &str,
        cnt: u32,
    ) -> Result<ApiResponse<HourlyForecast>, ApiError> {
        let url = join_url(&self.weather_base_url, "forecast");

        self.get_json(
            "hourly forecast",
            url,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", units.to_string()),
                ("cnt", cnt.to_string()),
            ],
        )
        .await
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
