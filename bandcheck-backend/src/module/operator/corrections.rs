//! Carrier name corrections and virtual sub-brands
//!
//! Some national carrier lists spell the same network several ways
//! ("Rogers Wireless", "Rogers Communications Canada Inc."). Per-country
//! rules collapse those onto one canonical name, and known MVNO sub-brands
//! are listed as carriers of their own on top of the parent network.
//! Data lives in `data/brand_corrections.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

const BUILTIN_CORRECTIONS: &str = include_str!("../../../data/brand_corrections.toml");

static BUILTIN: LazyLock<CorrectionTable> = LazyLock::new(|| {
    CorrectionTable::from_toml_str(BUILTIN_CORRECTIONS)
        .expect("embedded brand correction table is valid")
});

/// Rewrites a carrier whose brand or operator text contains a fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRule {
    pub fragments: Vec<String>,
    pub canonical: String,
}

impl BrandRule {
    fn matches(&self, brand_lower: &str, operator_lower: &str) -> bool {
        self.fragments.iter().any(|fragment| {
            let fragment = fragment.to_lowercase();
            brand_lower.contains(&fragment) || operator_lower.contains(&fragment)
        })
    }
}

/// Sub-brand listed with a copy of its parent's band data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualBrand {
    /// Unique id of the synthesized entry
    pub key: String,
    pub name: String,
    /// Canonical operator name of the parent network
    pub parent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCorrections {
    /// Country name as used by the carrier catalog
    pub name: String,
    #[serde(default, rename = "rule")]
    pub rules: Vec<BrandRule>,
    #[serde(default, rename = "virtual")]
    pub virtual_brands: Vec<VirtualBrand>,
}

impl CountryCorrections {
    /// Canonical operator name for a brand/operator pair, first rule wins
    pub fn canonical_name(&self, brand: &str, operator: &str) -> Option<&str> {
        let brand_lower = brand.to_lowercase();
        let operator_lower = operator.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&brand_lower, &operator_lower))
            .map(|rule| rule.canonical.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionTable {
    #[serde(default, rename = "country")]
    countries: Vec<CountryCorrections>,
}

impl CorrectionTable {
    /// The table shipped with the crate
    pub fn builtin() -> &'static CorrectionTable {
        &BUILTIN
    }

    /// A table without any corrections
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse brand correction table")
    }

    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read brand corrections: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn for_country(&self, country: &str) -> Option<&CountryCorrections> {
        self.countries.iter().find(|c| c.name == country)
    }

    pub fn countries(&self) -> &[CountryCorrections] {
        &self.countries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_canada_rules() {
        let canada = CorrectionTable::builtin().for_country("Canada").unwrap();
        assert_eq!(canada.rules.len(), 5);
        assert_eq!(canada.virtual_brands.len(), 4);

        assert_eq!(canada.canonical_name("Vidéotron", ""), Some("Videotron"));
        assert_eq!(canada.canonical_name("", "VIDEOTRON LTD"), Some("Videotron"));
        assert_eq!(canada.canonical_name("Freedom", "Freedom Mobile Inc."), Some("Freedom Mobile"));
        assert_eq!(canada.canonical_name("Rogers Wireless", "Rogers"), Some("Rogers"));
        assert_eq!(canada.canonical_name("", "Bell Mobility"), Some("Bell"));
        assert_eq!(canada.canonical_name("TELUS", ""), Some("Telus"));
        assert_eq!(canada.canonical_name("SaskTel", "SaskTel Mobility"), None);
    }

    #[test]
    fn test_rule_order_matters() {
        // "Rogers" appears before "Bell" in the rule list
        let canada = CorrectionTable::builtin().for_country("Canada").unwrap();
        assert_eq!(canada.canonical_name("Rogers", "Bell"), Some("Rogers"));
        // and Videotron is checked before everything else
        assert_eq!(canada.canonical_name("Vidéotron", "Rogers"), Some("Videotron"));
    }

    #[test]
    fn test_other_countries_uncorrected() {
        assert!(CorrectionTable::builtin().for_country("Germany").is_none());
        assert!(CorrectionTable::empty().for_country("Canada").is_none());
    }

    #[test]
    fn test_virtual_brand_parents() {
        let canada = CorrectionTable::builtin().for_country("Canada").unwrap();
        let fido = canada.virtual_brands.iter().find(|v| v.key == "fido").unwrap();
        assert_eq!(fido.parent, "Rogers");
        assert_eq!(fido.name, "Fido");
        let telus_subs = canada
            .virtual_brands
            .iter()
            .filter(|v| v.parent == "Telus")
            .count();
        assert_eq!(telus_subs, 2);
    }
}
