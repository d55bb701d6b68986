use std::sync::Arc;
use tokio::sync::watch;

use crate::{error::StoreError, store::CityStore};

/// Last searched city, usually "City, Country".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedCity {
    pub city: Option<String>,
}

impl SavedCity {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: Some(city.into()) }
    }

    /// The text a search should be submitted with, if a non-blank city is stored.
    pub fn search_query(&self) -> Option<String> {
        self.city
            .as_deref()
            .map(search_query_from_saved)
            .filter(|q| !q.is_empty())
    }
}

/// Pass-through between callers and the [`CityStore`].
#[derive(Debug, Clone)]
pub struct SavedCityService {
    store: Arc<dyn CityStore>,
}

impl SavedCityService {
    pub fn new(store: Arc<dyn CityStore>) -> Self {
        Self { store }
    }

    /// Overwrite the stored city. A `None` city is rejected.
    pub async fn save(&self, saved: &SavedCity) -> Result<(), StoreError> {
        let city = saved.city.as_deref().ok_or(StoreError::MissingCity)?;
        self.store.save(city).await
    }

    pub fn watch(&self) -> watch::Receiver<Option<String>> {
        self.store.read()
    }

    pub fn current(&self) -> SavedCity {
        SavedCity { city: self.watch().borrow().clone() }
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await
    }

    /// Best-effort save; failures are logged and reported as `false`.
    pub async fn remember(&self, city: impl Into<String>) -> bool {
        match self.save(&SavedCity::new(city)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist saved city");
                false
            }
        }
    }

    /// Best-effort clear; failures are logged and reported as `false`.
    pub async fn forget(&self) -> bool {
        match self.clear().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to clear saved city");
                false
            }
        }
    }
}

/// City part of a "City, Country" string, trimmed.
pub fn search_query_from_saved(saved: &str) -> String {
    saved.split(',').next().unwrap_or(saved).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCityStore;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct BrokenStore {
        current: watch::Sender<Option<String>>,
    }

    #[async_trait]
    impl CityStore for BrokenStore {
        async fn save(&self, _city: &str) -> Result<(), StoreError> {
            Err(StoreError::NoDataDir)
        }

        fn read(&self) -> watch::Receiver<Option<String>> {
            self.current.subscribe()
        }

        async fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::NoDataDir)
        }
    }

    fn service() -> SavedCityService {
        SavedCityService::new(Arc::new(MemoryCityStore::new()))
    }

    #[tokio::test]
    async fn save_then_read_then_clear() {
        let svc = service();
        assert_eq!(svc.current(), SavedCity::default());

        svc.save(&SavedCity::new("Lagos, NG")).await.unwrap();
        assert_eq!(svc.current().city.as_deref(), Some("Lagos, NG"));

        svc.clear().await.unwrap();
        assert_eq!(svc.current(), SavedCity::default());
    }

    #[tokio::test]
    async fn watch_follows_saves_and_clears() {
        let svc = service();
        let mut rx = svc.watch();

        svc.save(&SavedCity::new("Lagos, NG")).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("Lagos, NG"));

        assert!(svc.forget().await);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), None);
    }

    #[tokio::test]
    async fn save_overwrites_previous_value() {
        let svc = service();
        svc.save(&SavedCity::new("Lagos, NG")).await.unwrap();
        svc.save(&SavedCity::new("Nairobi, KE")).await.unwrap();
        assert_eq!(svc.current().city.as_deref(), Some("Nairobi, KE"));
    }

    #[tokio::test]
    async fn save_rejects_missing_city() {
        let svc = service();
        let err = svc.save(&SavedCity::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingCity));
    }

    #[tokio::test]
    async fn failures_are_not_fatal() {
        let (current, _) = watch::channel(None);
        let svc = SavedCityService::new(Arc::new(BrokenStore { current }));

        assert!(!svc.remember("Lagos, NG").await);
        assert!(!svc.forget().await);
        assert_eq!(svc.current(), SavedCity::default());
    }

    #[test]
    fn query_is_city_part_only() {
        assert_eq!(search_query_from_saved("Lagos, NG"), "Lagos");
        assert_eq!(search_query_from_saved("  Port Harcourt  "), "Port Harcourt");
        assert_eq!(SavedCity::new("Lagos, NG").search_query().as_deref(), Some("Lagos"));
        assert_eq!(SavedCity::new(" , NG").search_query(), None);
        assert_eq!(SavedCity::default().search_query(), None);
    }
}
