//! Device catalog queries: text search, brand list, SIM capabilities
use bandcheck_common::{normalize_name, Device};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Results shown for a bare text search
pub const DEFAULT_LIMIT: usize = 15;

/// Results shown once a brand or capability filter narrows the list
pub const FILTERED_LIMIT: usize = 100;

/// Shortest text query searched without any other filter
pub const MIN_QUERY_CHARS: usize = 2;

/// Capability filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Capability {
    #[default]
    #[serde(rename = "all")]
    All,
    /// eSIM alongside a physical SIM
    #[serde(rename = "esim")]
    Esim,
    #[serde(rename = "esim_only")]
    EsimOnly,
    #[serde(rename = "satellite")]
    Satellite,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::All => "all",
            Capability::Esim => "esim",
            Capability::EsimOnly => "esim_only",
            Capability::Satellite => "satellite",
        }
    }

    fn accepts(&self, device: &Device) -> bool {
        match self {
            Capability::All => true,
            Capability::Esim => {
                let sim = SimSupport::of(device);
                sim.has_esim && !sim.esim_only
            }
            Capability::EsimOnly => SimSupport::of(device).esim_only,
            Capability::Satellite => supports_satellite(device),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Capability::All),
            "esim" => Ok(Capability::Esim),
            "esim_only" | "esim-only" | "esimonly" => Ok(Capability::EsimOnly),
            "satellite" | "sat" => Ok(Capability::Satellite),
            _ => Err(format!("Unknown capability filter: {}", s)),
        }
    }
}

/// SIM form factors a device supports, read from its specification text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimSupport {
    pub has_esim: bool,
    pub esim_only: bool,
}

impl SimSupport {
    pub fn of(device: &Device) -> Self {
        let specs = device.specifications.to_lowercase();
        Self {
            has_esim: specs.contains("esim") || specs.contains("embedded-sim"),
            esim_only: specs.contains("esim only"),
        }
    }

    pub fn label(&self) -> &'static str {
        if self.esim_only {
            "eSIM Only"
        } else if self.has_esim {
            "eSIM Ready"
        } else {
            "Physical SIM"
        }
    }
}

/// Whether the specification mentions satellite connectivity
pub fn supports_satellite(device: &Device) -> bool {
    device.specifications.to_lowercase().contains("satellite")
}

/// Search filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceQuery {
    pub text: String,
    pub brand: Option<String>,
    pub capability: Capability,
}

impl DeviceQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    fn is_filtered(&self) -> bool {
        self.capability != Capability::All || self.brand.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Search the catalog
///
/// Returns nothing for an unfiltered query shorter than two chars. Curated
/// devices are listed first, otherwise catalog order is kept.
pub fn search_devices<'a>(devices: &'a [Device], query: &DeviceQuery) -> Vec<&'a Device> {
    let filtered = query.is_filtered();
    if !filtered && query.text.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let text = normalize_name(&query.text);
    let brand = query
        .brand
        .as_deref()
        .filter(|b| !b.is_empty())
        .map(str::to_lowercase);

    let mut matches: Vec<&Device> = devices
        .iter()
        .filter(|d| {
            brand
                .as_deref()
                .is_none_or(|b| d.name.to_lowercase().starts_with(b))
        })
        .filter(|d| query.capability.accepts(d))
        .filter(|d| text.is_empty() || d.search_name().contains(text.as_str()))
        .collect();

    matches.sort_by_key(|d| !d.provenance.is_curated());
    matches.truncate(if filtered { FILTERED_LIMIT } else { DEFAULT_LIMIT });
    matches
}

/// Distinct first words of device names, sorted
pub fn brands(devices: &[Device]) -> Vec<String> {
    devices
        .iter()
        .filter_map(|d| d.name.split(' ').next())
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
