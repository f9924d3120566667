use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Specification keys that carry band information
pub const SPEC_2G_BANDS: &str = "2G bands";
pub const SPEC_3G_BANDS: &str = "3G bands";
pub const SPEC_4G_BANDS: &str = "4G bands";
pub const SPEC_5G_BANDS: &str = "5G bands";
pub const SPEC_TECHNOLOGY: &str = "Technology";

/// Fields concatenated (in this order) to build a device's band list
pub const BAND_FIELDS: [&str; 5] = [
    SPEC_2G_BANDS,
    SPEC_3G_BANDS,
    SPEC_4G_BANDS,
    SPEC_5G_BANDS,
    SPEC_TECHNOLOGY,
];

/// Status literal of carriers that are currently in service
pub const STATUS_OPERATIONAL: &str = "Operational";

/// Where a device record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Provenance {
    /// Hand-maintained local list, preferred in search ranking
    #[serde(rename = "curated")]
    Curated,
    #[default]
    #[serde(rename = "bulk")]
    Bulk,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Curated => "curated",
            Provenance::Bulk => "bulk",
        }
    }

    pub fn is_curated(&self) -> bool {
        matches!(self, Provenance::Curated)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provenance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "curated" => Ok(Provenance::Curated),
            "bulk" => Ok(Provenance::Bulk),
            _ => Err(format!("Unknown provenance: {}", s)),
        }
    }
}

/// One device record from a device catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "lossy_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub brand_id: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub name: String,
    /// Lowercase name with all whitespace removed, filled in at load time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_name: Option<String>,
    /// JSON-encoded object of specification attributes
    #[serde(default, deserialize_with = "lossy_string")]
    pub specifications: String,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Device {
    pub fn new(id: impl Into<String>, name: impl Into<String>, specifications: impl Into<String>) -> Self {
        let mut device = Self {
            id: id.into(),
            brand_id: String::new(),
            name: name.into(),
            normalized_name: None,
            specifications: specifications.into(),
            provenance: Provenance::Bulk,
        };
        device.normalize();
        device
    }

    /// Builder-style provenance override
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Fill in `normalized_name` from `name`
    pub fn normalize(&mut self) {
        self.normalized_name = Some(normalize_name(&self.name));
    }

    /// Normalized name, computing it on the fly when the loader did not
    pub fn search_name(&self) -> std::borrow::Cow<'_, str> {
        match &self.normalized_name {
            Some(n) => std::borrow::Cow::Borrowed(n.as_str()),
            None => std::borrow::Cow::Owned(normalize_name(&self.name)),
        }
    }

    /// Parse the specification payload; malformed payloads yield an empty spec
    pub fn specification(&self) -> DeviceSpecification {
        DeviceSpecification::parse(&self.specifications)
    }
}

/// Lowercase and strip all whitespace
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parsed device specification attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpecification {
    fields: BTreeMap<String, String>,
}

impl DeviceSpecification {
    /// Parse a JSON object payload. Non-string values are kept in their JSON
    /// text form; `null` values are dropped.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw) {
            Ok(map) => {
                let fields = map
                    .into_iter()
                    .filter_map(|(k, v)| match v {
                        serde_json::Value::Null => None,
                        serde_json::Value::String(s) => Some((k, s)),
                        other => Some((k, other.to_string())),
                    })
                    .collect();
                Self { fields }
            }
            Err(e) => {
                tracing::debug!("Failed to parse device specifications: {}", e);
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of `key`, or "" when absent
    pub fn field(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The band-bearing fields joined by a single space
    pub fn combined_bands(&self) -> String {
        BAND_FIELDS
            .iter()
            .map(|key| self.field(key))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Operator record as published in the carrier catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperator {
    #[serde(default, deserialize_with = "lossy_string")]
    pub country_name: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub country_code: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub mcc: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub mnc: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub brand: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub operator: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lossy_string")]
    pub bands: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RawOperator {
    pub fn is_operational(&self) -> bool {
        self.status == STATUS_OPERATIONAL
    }
}

/// Normalized operator, one selectable carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub unique_id: String,
    pub country_name: String,
    pub country_code: String,
    pub mcc: String,
    pub mnc: String,
    pub brand: String,
    pub operator: String,
    pub status: String,
    /// e.g. "GSM 900 / GSM 1800 / UMTS 2100 / LTE 800"
    pub bands: String,
    pub notes: Option<String>,
}

impl Operator {
    /// Build from a raw record, overriding brand and operator name
    pub fn from_raw(raw: &RawOperator, brand: String, operator: String) -> Self {
        Self {
            unique_id: Self::derive_unique_id(&raw.mcc, &raw.mnc, &brand, &operator),
            country_name: raw.country_name.clone(),
            country_code: raw.country_code.clone(),
            mcc: raw.mcc.clone(),
            mnc: raw.mnc.clone(),
            brand,
            operator,
            status: raw.status.clone(),
            bands: raw.bands.clone(),
            notes: raw.notes.clone(),
        }
    }

    /// `<mcc>-<mnc>-<brand>-<operator>`, lowercase, whitespace removed
    pub fn derive_unique_id(mcc: &str, mnc: &str, brand: &str, operator: &str) -> String {
        normalize_name(&format!("{}-{}-{}-{}", mcc, mnc, brand, operator))
    }

    /// Brand when present, else the operator name
    pub fn display_name(&self) -> &str {
        if self.brand.is_empty() {
            &self.operator
        } else {
            &self.brand
        }
    }

    /// `<mcc>-<mnc>`
    pub fn network_code(&self) -> String {
        format!("{}-{}", self.mcc, self.mnc)
    }
}

/// Accept strings, numbers, booleans and null as a string field
fn lossy_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
