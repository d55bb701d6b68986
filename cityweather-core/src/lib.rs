//! Core library for the `cityweather` app.
//!
//! This crate defines:
//! - Remote API ports for city geocoding and weather, with an OpenWeather client
//! - A repository that injects the credential and fixed units
//! - Search and weather view-state flows
//! - Saved-city persistence and configuration
//!
//! It is used by `cityweather-cli`, but any other front end can drive the flows.

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
mod pending;
pub mod repository;
pub mod saved_city;
pub mod search;
pub mod store;
pub mod weather;

#[cfg(test)]
mod testing;

pub use api::{ApiResponse, GeocodingApi, OpenWeatherClient, WeatherApi};
pub use config::Config;
pub use error::{ApiError, StoreError};
pub use model::{CurrentConditions, GeoLocation, HourlyForecast};
pub use repository::{OpenWeatherRepository, WeatherRepository, repository_from_config};
pub use saved_city::{SavedCity, SavedCityService};
pub use search::{SearchFlow, SearchUiState};
pub use store::{CityStore, FileCityStore, MemoryCityStore};
pub use weather::{WeatherDisplay, WeatherFlow, WeatherUiState, WeatherView};
