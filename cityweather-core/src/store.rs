//! Persistence port for the saved city: one named store holding a single
//! string field under the key `CITY`.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{Mutex, watch};

use crate::error::StoreError;

pub const STORE_NAME: &str = "Saved_City_DataStore";

#[async_trait]
pub trait CityStore: Send + Sync + Debug {
    /// Overwrite the stored value.
    async fn save(&self, city: &str) -> Result<(), StoreError>;

    /// Live view of the stored value; `None` while the key is absent.
    fn read(&self) -> watch::Receiver<Option<String>>;

    /// Remove the key entirely.
    async fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(rename = "CITY", default, skip_serializing_if = "Option::is_none")]
    city: Option<String>,
}

/// TOML-file backed store. The whole file is replaced on every write.
#[derive(Debug)]
pub struct FileCityStore {
    path: PathBuf,
    current: watch::Sender<Option<String>>,
    write_lock: Mutex<()>,
}

impl FileCityStore {
    /// Open the store at `path`, loading any value already on disk.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let initial = read_store_file(&path)?.city;
        let (current, _) = watch::channel(initial);

        Ok(Self { path, current, write_lock: Mutex::new(()) })
    }

    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(Self::default_path()?)
    }

    /// `<platform data dir>/Saved_City_DataStore.toml`
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or(StoreError::NoDataDir)?;

        Ok(dirs.data_dir().join(format!("{STORE_NAME}.toml")))
    }

    /// Like [`FileCityStore::open`], but a store that can't be opened is
    /// replaced by an empty [`MemoryCityStore`] so callers keep working.
    pub fn open_or_memory(path: impl Into<PathBuf>) -> Arc<dyn CityStore> {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => Arc::new(store),
            Err(e) => memory_fallback(&e),
        }
    }

    pub fn open_default_or_memory() -> Arc<dyn CityStore> {
        match Self::default_path() {
            Ok(path) => Self::open_or_memory(path),
            Err(e) => memory_fallback(&e),
        }
    }

    async fn write(&self, contents: StoreFile) -> Result<(), StoreError> {
        let toml = toml::to_string(&contents)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|source| io_error(parent, source))?;
        }

        let tmp = self.path.with_extension("toml.tmp");
        tokio::fs::write(&tmp, toml).await.map_err(|source| io_error(&tmp, source))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|source| io_error(&self.path, source))?;

        Ok(())
    }
}

#[async_trait]
impl CityStore for FileCityStore {
    async fn save(&self, city: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        self.write(StoreFile { city: Some(city.to_string()) }).await?;
        self.current.send_replace(Some(city.to_string()));

        tracing::debug!(path = %self.path.display(), "saved city written");
        Ok(())
    }

    fn read(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        self.write(StoreFile::default()).await?;
        self.current.send_replace(None);

        tracing::debug!(path = %self.path.display(), "saved city cleared");
        Ok(())
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug)]
pub struct MemoryCityStore {
    current: watch::Sender<Option<String>>,
}

impl MemoryCityStore {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }
}

impl Default for MemoryCityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CityStore for MemoryCityStore {
    async fn save(&self, city: &str) -> Result<(), StoreError> {
        self.current.send_replace(Some(city.to_string()));
        Ok(())
    }

    fn read(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.current.send_replace(None);
        Ok(())
    }
}

fn memory_fallback(error: &StoreError) -> Arc<dyn CityStore> {
    tracing::warn!(%error, "saved city store unavailable; changes will not be kept");
    Arc::new(MemoryCityStore::new())
}

fn read_store_file(path: &Path) -> Result<StoreFile, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreFile::default()),
        Err(source) => return Err(io_error(path, source)),
    };

    Ok(toml::from_str(&contents)?)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io { path: path.display().to_string(), source }
}
