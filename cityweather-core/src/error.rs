use thiserror::Error;

/// Failure to complete a remote call at all. A non-2xx status is not an
/// `ApiError`; it comes back as an [`ApiResponse`](crate::api::ApiResponse).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine platform data directory")]
    NoDataDir,

    #[error("saved city store I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode saved city store: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("failed to decode saved city store: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("refusing to save an empty city")]
    MissingCity,
}
