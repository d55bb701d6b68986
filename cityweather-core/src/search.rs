//! City search view state and the flow that drives it.

use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    model::GeoLocation,
    pending::{self, PendingRequest},
    repository::WeatherRepository,
    saved_city::SavedCity,
};

pub const CITY_NOT_FOUND: &str = "City not found. Please try a different city name.";
pub const SEARCH_FAILED: &str = "Search failed. Please check your internet connection.";
pub const SEARCH_NETWORK_ERROR: &str = "Network error. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchUiState {
    pub search_text: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_search_enabled: bool,
}

/// Turns free text into a single [`GeoLocation`] and hands it to a navigation
/// callback. Errors end up in [`SearchUiState::error_message`].
#[derive(Debug)]
pub struct SearchFlow {
    repository: Arc<dyn WeatherRepository>,
    state: watch::Sender<SearchUiState>,
    pending: PendingRequest,
}

impl SearchFlow {
    pub fn new(repository: Arc<dyn WeatherRepository>) -> Self {
        let (state, _) = watch::channel(SearchUiState::default());
        Self { repository, state, pending: PendingRequest::default() }
    }

    pub fn state(&self) -> SearchUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchUiState> {
        self.state.subscribe()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| {
            s.is_search_enabled = !text.trim().is_empty();
            s.search_text = text;
            s.error_message = None;
        });
    }

    /// Fill an empty search field from the remembered city.
    pub fn prefill(&self, saved: &SavedCity) {
        if !self.state.borrow().search_text.trim().is_empty() {
            return;
        }
        if let Some(query) = saved.search_query() {
            self.set_text(query);
        }
    }

    /// Search for the current text. Blank text is ignored. On a hit,
    /// `on_navigate` is called exactly once with the first candidate. A newer
    /// `submit` (or `clear`) supersedes this one: its result is dropped and
    /// `on_navigate` is never called.
    pub async fn submit<F>(&self, on_navigate: F)
    where
        F: FnOnce(GeoLocation),
    {
        let query = self.state.borrow().search_text.trim().to_string();
        if query.is_empty() {
            return;
        }

        let token = self.pending.start(&self.state, |s| {
            s.is_loading = true;
            s.error_message = None;
        });

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(%query, "city search superseded");
                return;
            }
            result = self.repository.search_cities(&query) => result,
        };

        let outcome = match result {
            Ok(res) if res.is_success() => {
                res.body.unwrap_or_default().into_iter().next().ok_or(CITY_NOT_FOUND)
            }
            Ok(res) => {
                tracing::warn!(status = res.status, "city search returned non-success status");
                Err(SEARCH_FAILED)
            }
            Err(e) => {
                tracing::warn!(error = %e, "city search failed");
                Err(SEARCH_NETWORK_ERROR)
            }
        };

        let applied = match &outcome {
            Ok(_) => pending::apply(&self.state, &token, |s| s.is_loading = false),
            Err(message) => pending::apply(&self.state, &token, |s| {
                s.is_loading = false;
                s.error_message = Some(message.to_string());
            }),
        };
        if !applied {
            tracing::debug!(%query, "city search superseded");
            return;
        }

        if let Ok(location) = outcome {
            tracing::info!(city = %location.display_name(), "city resolved");
            on_navigate(location);
        }
    }

    /// Back to the empty default state; an in-flight search is abandoned.
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            self.pending.cancel();
            *s = SearchUiState::default();
        });
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error_message = None);
    }
}
