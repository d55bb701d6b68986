use anyhow::Context;
use async_trait::async_trait;
use std::{fmt, sync::Arc};

use crate::{
    Config,
    api::{
        ApiResponse, DEFAULT_FORECAST_COUNT, DEFAULT_SEARCH_LIMIT, DEFAULT_UNITS, GeocodingApi,
        OpenWeatherClient, WeatherApi,
    },
    error::ApiError,
    model::{CurrentConditions, GeoLocation, HourlyForecast},
};

/// Domain-level access to the remote ports. Responses are returned unmodified.
#[async_trait]
pub trait WeatherRepository: Send + Sync + fmt::Debug {
    async fn search_cities(&self, query: &str) -> Result<ApiResponse<Vec<GeoLocation>>, ApiError>;

    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ApiResponse<CurrentConditions>, ApiError>;

    async fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ApiResponse<HourlyForecast>, ApiError>;
}

/// Forwards to the ports with a fixed credential, metric units, and the
/// default search limit and forecast count.
#[derive(Clone)]
pub struct OpenWeatherRepository {
    geocoding: Arc<dyn GeocodingApi>,
    weather: Arc<dyn WeatherApi>,
    api_key: String,
}

impl OpenWeatherRepository {
    pub fn new(
        geocoding: Arc<dyn GeocodingApi>,
        weather: Arc<dyn WeatherApi>,
        api_key: impl Into<String>,
    ) -> Self {
        Self { geocoding, weather, api_key: api_key.into() }
    }
}

impl fmt::Debug for OpenWeatherRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherRepository")
            .field("geocoding", &self.geocoding)
            .field("weather", &self.weather)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl WeatherRepository for OpenWeatherRepository {
    async fn search_cities(&self, query: &str) -> Result<ApiResponse<Vec<GeoLocation>>, ApiError> {
        self.geocoding.search_cities(query, DEFAULT_SEARCH_LIMIT, &self.api_key).await
    }

    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ApiResponse<CurrentConditions>, ApiError> {
        self.weather.current_weather(lat, lon, &self.api_key, DEFAULT_UNITS).await
    }

    async fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ApiResponse<HourlyForecast>, ApiError> {
        self.weather
            .hourly_forecast(lat, lon, &self.api_key, DEFAULT_UNITS, DEFAULT_FORECAST_COUNT)
            .await
    }
}

/// Build the OpenWeather-backed repository described by `config`.
pub fn repository_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherRepository>> {
    let api_key = config.api_key()?;

    let client = Arc::new(
        OpenWeatherClient::new(
            config.geocoding_base_url.clone(),
            config.weather_base_url.clone(),
            config.timeout(),
        )
        .context("Failed to build HTTP client")?,
    );

    Ok(Arc::new(OpenWeatherRepository::new(client.clone(), client, api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GeocodingApi for RecordingApi {
        async fn search_cities(
            &self,
            query: &str,
            limit: u32,
            api_key: &str,
        ) -> Result<ApiResponse<Vec<GeoLocation>>, ApiError> {
            self.calls.lock().push(format!("search q={query} limit={limit} key={api_key}"));
            Ok(ApiResponse::success(200, vec![fixtures::lagos()]))
        }
    }

    #[async_trait]
    impl WeatherApi for RecordingApi {
        async fn current_weather(
            &self,
            lat: f64,
            lon: f64,
            api_key: &str,
            units: &str,
        ) -> Result<ApiResponse<CurrentConditions>, ApiError> {
            self.calls.lock().push(format!("current {lat},{lon} key={api_key} units={units}"));
            Ok(ApiResponse::failure(503))
        }

        async fn hourly_forecast(
            &self,
            lat: f64,
            lon: f64,
            api_key: &str,
            units: &str,
            cnt: u32,
        ) -> Result<ApiResponse<HourlyForecast>, ApiError> {
            self.calls
                .lock()
                .push(format!("hourly {lat},{lon} key={api_key} units={units} cnt={cnt}"));
            Ok(ApiResponse::failure(404))
        }
    }

    #[tokio::test]
    async fn injects_key_units_limit_and_count() {
        let api = Arc::new(RecordingApi::default());
        let repo = OpenWeatherRepository::new(api.clone(), api.clone(), "SECRET");

        let found = repo.search_cities("Lagos").await.expect("fake never fails");
        assert_eq!(found.body.map(|v| v.len()), Some(1));

        let current = repo.current_weather(6.52, 3.38).await.expect("fake never fails");
        assert_eq!(current.status, 503);

        let hourly = repo.hourly_forecast(6.52, 3.38).await.expect("fake never fails");
        assert_eq!(hourly.status, 404);

        assert_eq!(
            *api.calls.lock(),
            vec![
                "search q=Lagos limit=5 key=SECRET".to_string(),
                "current 6.52,3.38 key=SECRET units=metric".to_string(),
                "hourly 6.52,3.38 key=SECRET units=metric cnt=8".to_string(),
            ]
        );
    }

    #[test]
    fn repository_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let repo = repository_from_config(&cfg).expect("key is configured");
        assert!(format!("{repo:?}").contains("<redacted>"));
    }

    #[test]
    fn debug_output_redacts_key() {
        let api = Arc::new(RecordingApi::default());
        let repo = OpenWeatherRepository::new(api.clone(), api, "SECRET");
        let dbg = format!("{repo:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("<redacted>"));
    }
}
