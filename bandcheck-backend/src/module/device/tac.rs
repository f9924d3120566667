//! TAC lookup tables
//!
//! Two tables map a Type Allocation Code to a device:
//! - curated: TAC -> catalog device id, shipped in `data/curated_tac.toml`
//! - bulk: TAC -> free-text "brand model", built by the `tac-lite` step

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

const BUILTIN_CURATED: &str = include_str!("../../../data/curated_tac.toml");

static CURATED: LazyLock<TacIndex> = LazyLock::new(|| {
    TacIndex::from_toml_str(BUILTIN_CURATED).expect("embedded curated TAC table is valid")
});

#[derive(Debug, Deserialize)]
struct CuratedTacFile {
    #[serde(default)]
    tac: HashMap<String, String>,
}

/// Read-only TAC -> value map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TacIndex {
    entries: HashMap<String, String>,
}

impl TacIndex {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Curated TAC -> device id table shipped with the crate
    pub fn curated() -> &'static TacIndex {
        &CURATED
    }

    /// Parse a curated table (`[tac]` section of TAC = device id pairs)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CuratedTacFile =
            toml::from_str(content).context("Failed to parse curated TAC table")?;
        Ok(Self::new(file.tac))
    }

    /// Parse a bulk table (flat JSON object of TAC -> generic name)
    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(content).context("Failed to parse TAC database")?;
        Ok(Self::new(entries))
    }

    pub async fn load_curated_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read curated TAC table: {}", path.display()))?;
        let index = Self::from_toml_str(&content)?;
        tracing::info!("Loaded {} curated TACs from {}", index.len(), path.display());
        Ok(index)
    }

    pub fn get(&self, tac: &str) -> Option<&str> {
        self.entries.get(tac).map(String::as_str)
    }

    pub fn contains(&self, tac: &str) -> bool {
        self.entries.contains_key(tac)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for TacIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_builtin() {
        let curated = TacIndex::curated();
        assert_eq!(curated.len(), 29);
        assert_eq!(curated.get("35616909"), Some("ipxs"));
        // two slots of the same phone share a device id
        assert_eq!(curated.get("35719629"), curated.get("35677091"));
        assert!(curated.get("00000000").is_none());
    }

    #[test]
    fn test_curated_keys_are_tacs() {
        let curated = TacIndex::curated();
        for tac in curated.entries.keys() {
            assert_eq!(tac.len(), 8, "{}", tac);
            assert!(tac.chars().all(|c| c.is_ascii_digit()), "{}", tac);
        }
    }

    #[test]
    fn test_bulk_from_json() {
        let bulk = TacIndex::from_json_str(r#"{"35332811": "Samsung Galaxy S21", "01234500": "Nokia 3310"}"#)
            .unwrap();
        assert_eq!(bulk.get("35332811"), Some("Samsung Galaxy S21"));
        assert_eq!(bulk.len(), 2);
        assert!(TacIndex::from_json_str("[]").is_err());
    }

    #[tokio::test]
    async fn test_load_curated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tac.toml");
        tokio::fs::write(&path, "[tac]\n\"12345678\" = \"dev-1\"\n").await.unwrap();
        let index = TacIndex::load_curated_file(&path).await.unwrap();
        assert_eq!(index.get("12345678"), Some("dev-1"));
    }
}
