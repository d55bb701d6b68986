//! Weather home view state: current conditions plus a short hourly outlook
//! for one location at a time.

use chrono::Local;
use parking_lot::Mutex;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    api::ApiResponse,
    error::ApiError,
    format,
    model::{CurrentConditions, GeoLocation, HourlyForecast},
    pending::{self, PendingRequest},
    repository::WeatherRepository,
    saved_city::SavedCityService,
};

pub const WEATHER_LOAD_FAILED: &str = "Failed to load weather data. Please try again.";
pub const WEATHER_NETWORK_ERROR: &str = "Network error. Please check your internet connection.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherUiState {
    pub is_loading: bool,
    pub weather_data: Option<CurrentConditions>,
    pub hourly_forecast: Option<HourlyForecast>,
    pub current_location: Option<GeoLocation>,
    pub error_message: Option<String>,
    pub current_date: String,
    pub current_time: String,
}

/// The one branch a renderer should show for a given state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeatherView<'a> {
    Initial,
    Loading,
    Error(&'a str),
    Ready(&'a CurrentConditions),
}

impl WeatherUiState {
    pub fn view(&self) -> WeatherView<'_> {
        if self.is_loading {
            return WeatherView::Loading;
        }
        if let Some(message) = self.error_message.as_deref() {
            return WeatherView::Error(message);
        }
        match &self.weather_data {
            Some(data) => WeatherView::Ready(data),
            None => WeatherView::Initial,
        }
    }
}

/// Everything the home view prints, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherDisplay {
    pub location: String,
    pub temperature: String,
    pub description: String,
    pub min_max: String,
    pub precipitation: String,
    pub humidity: String,
    pub wind_speed: String,
    pub visibility: String,
    /// `(time, temperature)` for the first forecast steps.
    pub hourly: Vec<(String, String)>,
    pub date: String,
    pub time: String,
}

pub struct WeatherFlow {
    repository: Arc<dyn WeatherRepository>,
    saved_city: SavedCityService,
    state: watch::Sender<WeatherUiState>,
    pending: PendingRequest,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl std::fmt::Debug for WeatherFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherFlow")
            .field("repository", &self.repository)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl WeatherFlow {
    pub fn new(repository: Arc<dyn WeatherRepository>, saved_city: SavedCityService) -> Self {
        Self::with_rng(repository, saved_city, Box::new(StdRng::from_os_rng()))
    }

    /// Same as [`WeatherFlow::new`] with a fixed source for the precipitation estimate.
    pub fn with_rng(
        repository: Arc<dyn WeatherRepository>,
        saved_city: SavedCityService,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let (state, _) = watch::channel(WeatherUiState::default());
        let flow = Self {
            repository,
            saved_city,
            state,
            pending: PendingRequest::default(),
            rng: Mutex::new(rng),
        };
        flow.refresh_clock();
        flow
    }

    pub fn state(&self) -> WeatherUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherUiState> {
        self.state.subscribe()
    }

    /// Fetch current conditions and the hourly forecast for `location`.
    ///
    /// Both requests run concurrently. A failed forecast only leaves
    /// `hourly_forecast` empty; a failed current-conditions request fails the
    /// load. A newer `load` supersedes this one and its results are dropped.
    pub async fn load(&self, location: GeoLocation) {
        let (lat, lon) = (location.lat, location.lon);

        let token = self.pending.start(&self.state, |s| {
            if s.current_location.as_ref() != Some(&location) {
                s.weather_data = None;
                s.hourly_forecast = None;
            }
            s.is_loading = true;
            s.error_message = None;
            s.current_location = Some(location);
        });

        let fetch = async {
            tokio::join!(
                self.repository.current_weather(lat, lon),
                self.repository.hourly_forecast(lat, lon)
            )
        };

        let (current, hourly) = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(lat, lon, "weather load superseded");
                return;
            }
            results = fetch => results,
        };

        let hourly = hourly_or_none(hourly);

        match current {
            Ok(res) if res.is_success() && res.body.is_some() => {
                let has_hourly = hourly.is_some();
                let applied = pending::apply(&self.state, &token, |s| {
                    s.is_loading = false;
                    s.weather_data = res.body;
                    s.hourly_forecast = hourly;
                    s.error_message = None;
                });
                if applied {
                    tracing::info!(lat, lon, has_hourly, "weather loaded");
                    self.refresh_clock();
                }
            }
            Ok(res) => {
                tracing::warn!(status = res.status, "current weather returned non-success status");
                self.fail(&token, WEATHER_LOAD_FAILED);
            }
            Err(e) => {
                tracing::warn!(error = %e, "current weather request failed");
                self.fail(&token, WEATHER_NETWORK_ERROR);
            }
        }
    }

    /// Reload the last requested location. Returns `false` if there is none.
    pub async fn retry(&self) -> bool {
        let location = self.state.borrow().current_location.clone();
        match location {
            Some(location) => {
                self.load(location).await;
                true
            }
            None => false,
        }
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error_message = None);
    }

    pub fn refresh_clock(&self) {
        let now = Local::now();
        self.state.send_modify(|s| {
            s.current_date = format::formatted_date(&now);
            s.current_time = format::formatted_time(&now);
        });
    }

    /// Remember the current location as the saved city. Best effort.
    pub async fn save_favorite_city(&self) -> bool {
        let name = self.state.borrow().current_location.as_ref().map(GeoLocation::display_name);
        match name {
            Some(name) => self.saved_city.remember(name).await,
            None => false,
        }
    }

    /// Formatted values for the loaded conditions, `None` until data is present.
    pub fn display(&self) -> Option<WeatherDisplay> {
        let state = self.state.borrow().clone();
        let data = state.weather_data.as_ref()?;

        let precipitation = state
            .hourly_forecast
            .as_ref()
            .and_then(format::real_precipitation_percentage)
            .unwrap_or_else(|| {
                let mut rng = self.rng.lock();
                format::estimated_precipitation_percentage(data.clouds.all, &mut **rng)
            });

        let hourly = state
            .hourly_forecast
            .as_ref()
            .map(|f| {
                format::hourly_forecast_times(f)
                    .into_iter()
                    .zip(format::hourly_forecast_temperatures(f))
                    .collect()
            })
            .unwrap_or_default();

        let location = state
            .current_location
            .as_ref()
            .map(GeoLocation::display_name)
            .unwrap_or_else(|| format!("{}, {}", data.name, data.sys.country));

        Some(WeatherDisplay {
            location,
            temperature: format::formatted_temperature(data.main.temp),
            description: format::capitalized_description(data),
            min_max: format::formatted_min_max(&data.main),
            precipitation,
            humidity: format::formatted_humidity(data.main.humidity),
            wind_speed: format::formatted_wind_speed(data.wind.speed),
            visibility: format::formatted_visibility(data.visibility),
            hourly,
            date: state.current_date.clone(),
            time: state.current_time.clone(),
        })
    }

    fn fail(&self, token: &CancellationToken, message: &str) {
        pending::apply(&self.state, token, |s| {
            s.is_loading = false;
            s.error_message = Some(message.to_string());
        });
    }
}

fn hourly_or_none(
    result: Result<ApiResponse<HourlyForecast>, ApiError>,
) -> Option<HourlyForecast> {
    match result {
        Ok(res) if res.is_success() => res.body,
        Ok(res) => {
            tracing::warn!(status = res.status, "hourly forecast unavailable");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "hourly forecast request failed");
            None
        }
    }
}
