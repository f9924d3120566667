//! Catalog loader
//!
//! Fetches every dataset the checker needs from its configured source. A
//! source is either an `http(s)://` URL or a local file path.
//!
//! Loading never fails as a whole: a source that cannot be fetched or parsed
//! is logged and replaced by an empty dataset (or the builtin table).

use anyhow::{Context, Result};
use bandcheck_common::{Device, Provenance, RawOperator};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{CatalogError, CatalogResult};
use super::types::Catalog;
use crate::config::AppConfig;
use crate::module::bands::BandTable;
use crate::module::device::TacIndex;
use crate::module::operator::CorrectionTable;

const USER_AGENT: &str = "Mozilla/5.0 bandcheck/0.1";

/// Where a dataset is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Device catalog file layout
#[derive(Debug, Deserialize)]
struct DeviceRecords {
    #[serde(rename = "RECORDS", default)]
    records: Vec<Device>,
}

pub struct CatalogLoader {
    client: Client,
    operators: Source,
    devices: Source,
    local_devices: Source,
    tac_lite: Source,
    curated_tac_path: Option<PathBuf>,
    band_table_path: Option<PathBuf>,
    corrections_path: Option<PathBuf>,
}

impl CatalogLoader {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build reqwest client")?;

        Ok(Self {
            client,
            operators: Source::parse(&config.operators_url),
            devices: Source::parse(&config.devices_url),
            local_devices: Source::parse(&config.local_devices_path),
            tac_lite: Source::parse(&config.tac_lite_path),
            curated_tac_path: config.curated_tac_path.clone(),
            band_table_path: config.band_table_path.clone(),
            corrections_path: config.corrections_path.clone(),
        })
    }

    async fn read_source(&self, source: &Source) -> CatalogResult<String> {
        match source {
            Source::Url(url) => {
                let response = self.client.get(url).send().await.map_err(|source| {
                    CatalogError::RequestFailed {
                        url: url.clone(),
                        source,
                    }
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::ServerReturnedError {
                        url: url.clone(),
                        status,
                    });
                }
                response
                    .text()
                    .await
                    .map_err(|source| CatalogError::RequestFailed {
                        url: url.clone(),
                        source,
                    })
            }
            Source::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::ReadFailed {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(&self, source: &Source) -> CatalogResult<T> {
        let body = self.read_source(source).await?;
        serde_json::from_str(&body).map_err(|source_err| CatalogError::JsonParseFailed {
            origin: source.to_string(),
            source: source_err,
        })
    }

    pub async fn try_fetch_operators(&self) -> CatalogResult<Vec<RawOperator>> {
        self.read_json(&self.operators).await
    }

    /// Read a `{ "RECORDS": [...] }` device catalog, tagging each device
    pub async fn try_fetch_devices(
        &self,
        source: &Source,
        provenance: Provenance,
    ) -> CatalogResult<Vec<Device>> {
        let file: DeviceRecords = self.read_json(source).await?;
        Ok(file
            .records
            .into_iter()
            .map(|mut d| {
                d.normalize();
                d.provenance = provenance;
                d
            })
            .collect())
    }

    pub async fn try_fetch_tac_lite(&self) -> CatalogResult<TacIndex> {
        let entries: HashMap<String, String> = self.read_json(&self.tac_lite).await?;
        Ok(TacIndex::new(entries))
    }

    pub async fn fetch_operators(&self) -> Vec<RawOperator> {
        match self.try_fetch_operators().await {
            Ok(operators) => {
                tracing::info!("Loaded {} operator records from {}", operators.len(), self.operators);
                operators
            }
            Err(e) => {
                tracing::warn!("Error fetching operators: {:#}", anyhow::Error::from(e));
                Vec::new()
            }
        }
    }

    pub async fn fetch_local_devices(&self) -> Vec<Device> {
        match self.try_fetch_devices(&self.local_devices, Provenance::Curated).await {
            Ok(devices) => {
                tracing::info!("Loaded {} curated devices from {}", devices.len(), self.local_devices);
                devices
            }
            Err(e) => {
                tracing::warn!("Error loading local devices: {:#}", anyhow::Error::from(e));
                Vec::new()
            }
        }
    }

    pub async fn fetch_external_devices(&self) -> Vec<Device> {
        match self.try_fetch_devices(&self.devices, Provenance::Bulk).await {
            Ok(devices) => {
                tracing::info!("Loaded {} devices from {}", devices.len(), self.devices);
                devices
            }
            Err(e) => {
                tracing::warn!("Error fetching global device database: {:#}", anyhow::Error::from(e));
                Vec::new()
            }
        }
    }

    pub async fn fetch_tac_lite(&self) -> TacIndex {
        match self.try_fetch_tac_lite().await {
            Ok(index) => {
                tracing::info!("Loaded {} TACs from {}", index.len(), self.tac_lite);
                index
            }
            Err(e) => {
                tracing::warn!("Failed to load TAC database: {:#}", anyhow::Error::from(e));
                TacIndex::empty()
            }
        }
    }

    async fn load_curated_tac(&self) -> TacIndex {
        match &self.curated_tac_path {
            Some(path) => TacIndex::load_curated_file(path)
                .await
                .unwrap_or_else(|e| fallback("curated TAC table", path, e, TacIndex::curated())),
            None => TacIndex::curated().clone(),
        }
    }

    async fn load_band_table(&self) -> BandTable {
        match &self.band_table_path {
            Some(path) => BandTable::load_from_file(path)
                .await
                .unwrap_or_else(|e| fallback("band table", path, e, BandTable::builtin())),
            None => BandTable::builtin().clone(),
        }
    }

    async fn load_corrections(&self) -> CorrectionTable {
        match &self.corrections_path {
            Some(path) => CorrectionTable::load_from_file(path)
                .await
                .unwrap_or_else(|e| fallback("brand corrections", path, e, CorrectionTable::builtin())),
            None => CorrectionTable::builtin().clone(),
        }
    }

    /// Operators, curated devices and the bulk TAC database, fetched concurrently
    pub async fn load_initial(&self) -> Catalog {
        let (operators, devices, bulk_tac, curated_tac, bands, corrections) = tokio::join!(
            self.fetch_operators(),
            self.fetch_local_devices(),
            self.fetch_tac_lite(),
            self.load_curated_tac(),
            self.load_band_table(),
            self.load_corrections(),
        );

        Catalog {
            operators,
            devices,
            curated_tac,
            bulk_tac,
            bands,
            corrections,
            loaded_at: Utc::now(),
        }
    }

    /// `initial` with the external device catalog merged after its devices
    pub async fn load_full(&self, initial: &Catalog) -> Catalog {
        let external = self.fetch_external_devices().await;
        let devices = merge_devices(initial.devices.clone(), external);
        tracing::info!("Device catalog merged: {} devices", devices.len());

        Catalog {
            devices,
            loaded_at: Utc::now(),
            ..initial.clone()
        }
    }
}

fn fallback<T: Clone>(what: &str, path: &Path, err: anyhow::Error, builtin: &T) -> T {
    tracing::warn!("Failed to load {} from {}, using builtin: {:#}", what, path.display(), err);
    builtin.clone()
}

/// Append external devices whose lowercase name is not already in `curated`
pub fn merge_devices(curated: Vec<Device>, external: Vec<Device>) -> Vec<Device> {
    let known: HashSet<String> = curated.iter().map(|d| d.name.to_lowercase()).collect();
    let mut merged = curated;
    merged.extend(
        external
            .into_iter()
            .filter(|d| !known.contains(&d.name.to_lowercase())),
    );
    merged
}
