use std::path::PathBuf;

/// Failure while fetching one catalog source
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("request to {url} failed")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status code {status}")]
    ServerReturnedError {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON from {origin}")]
    JsonParseFailed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
