//! Scripted repository for flow tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::oneshot;

use crate::{
    api::ApiResponse,
    error::ApiError,
    model::{CurrentConditions, GeoLocation, HourlyForecast},
    repository::WeatherRepository,
};

pub(crate) enum Scripted<T> {
    Respond(ApiResponse<T>),
    Fail,
    /// Held until the sender fires; a dropped sender behaves like `Fail`.
    Wait(oneshot::Receiver<ApiResponse<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<ApiResponse<T>, ApiError> {
        match self {
            Scripted::Respond(res) => Ok(res),
            Scripted::Fail => Err(decode_error()),
            Scripted::Wait(rx) => rx.await.map_err(|_| decode_error()),
        }
    }
}

impl<T> std::fmt::Debug for Scripted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Scripted::Respond(_) => "Respond",
            Scripted::Fail => "Fail",
            Scripted::Wait(_) => "Wait",
        })
    }
}

fn decode_error() -> ApiError {
    let source = serde_json::from_str::<u8>("not json").unwrap_err();
    ApiError::Decode { endpoint: "fake", source }
}

#[derive(Debug, Default)]
pub(crate) struct FakeRepository {
    search: Mutex<VecDeque<Scripted<Vec<GeoLocation>>>>,
    current: Mutex<VecDeque<Scripted<CurrentConditions>>>,
    hourly: Mutex<VecDeque<Scripted<HourlyForecast>>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRepository {
    pub fn push_search(&self, step: Scripted<Vec<GeoLocation>>) -> &Self {
        self.search.lock().push_back(step);
        self
    }

    pub fn push_current(&self, step: Scripted<CurrentConditions>) -> &Self {
        self.current.lock().push_back(step);
        self
    }

    pub fn push_hourly(&self, step: Scripted<HourlyForecast>) -> &Self {
        self.hourly.lock().push_back(step);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl WeatherRepository for FakeRepository {
    async fn search_cities(&self, query: &str) -> Result<ApiResponse<Vec<GeoLocation>>, ApiError> {
        self.calls.lock().push(format!("search {query}"));
        let step = self.search.lock().pop_front().expect("unscripted search call");
        step.resolve().await
    }

    async fn current_weather(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ApiResponse<CurrentConditions>, ApiError> {
        self.calls.lock().push(format!("current {lat},{lon}"));
        let step = self.current.lock().pop_front().expect("unscripted current call");
        step.resolve().await
    }

    async fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ApiResponse<HourlyForecast>, ApiError> {
        self.calls.lock().push(format!("hourly {lat},{lon}"));
        let step = self.hourly.lock().pop_front().expect("unscripted hourly call");
        step.resolve().await
    }
}
