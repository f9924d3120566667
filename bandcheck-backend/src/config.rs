use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "bandcheck.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Carrier catalog, URL or local path
    #[serde(default = "default_operators_url")]
    pub operators_url: String,

    /// Full device catalog, URL or local path
    #[serde(default = "default_devices_url")]
    pub devices_url: String,

    /// Curated device catalog, URL or local path
    #[serde(default = "default_local_devices_path")]
    pub local_devices_path: String,

    /// Bulk TAC database produced by `bandcheck tac-lite`
    #[serde(default = "default_tac_lite_path")]
    pub tac_lite_path: String,

    /// Overrides the embedded curated TAC table
    #[serde(default)]
    pub curated_tac_path: Option<PathBuf>,

    /// Overrides the embedded band equivalence table
    #[serde(default)]
    pub band_table_path: Option<PathBuf>,

    /// Overrides the embedded brand correction table
    #[serde(default)]
    pub corrections_path: Option<PathBuf>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Fetch and merge the full device catalog after the curated one
    #[serde(default = "default_fetch_full_catalog")]
    pub fetch_full_catalog: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_operators_url() -> String {
    "https://raw.githubusercontent.com/pbakondy/mcc-mnc-list/master/mcc-mnc-list.json".to_string()
}

fn default_devices_url() -> String {
    "https://raw.githubusercontent.com/ilyasozkurt/mobilephone-brands-and-models/master/devices.json"
        .to_string()
}

fn default_local_devices_path() -> String {
    "data/devices.json".to_string()
}

fn default_tac_lite_path() -> String {
    "data/tac_lite.json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_fetch_full_catalog() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            operators_url: default_operators_url(),
            devices_url: default_devices_url(),
            local_devices_path: default_local_devices_path(),
            tac_lite_path: default_tac_lite_path(),
            curated_tac_path: None,
            band_table_path: None,
            corrections_path: None,
            request_timeout_secs: default_request_timeout_secs(),
            fetch_full_catalog: default_fetch_full_catalog(),
        }
    }
}

impl AppConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Read `path`, falling back to defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }
}
