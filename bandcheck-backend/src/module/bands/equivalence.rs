//! Band equivalence table
//!
//! Maps legacy `<TECH> <FREQUENCY>` band names (e.g. "LTE 800") to the
//! aliases device specifications use for the same band ("Band 20", "B20",
//! "800"). The table is curated data kept in `data/band_equivalence.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

const BUILTIN_TABLE: &str = include_str!("../../../data/band_equivalence.toml");

static BUILTIN: LazyLock<BandTable> = LazyLock::new(|| {
    BandTable::from_toml_str(BUILTIN_TABLE).expect("embedded band equivalence table is valid")
});

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandEquivalence {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BandTableFile {
    #[serde(default, rename = "band")]
    bands: Vec<BandEquivalence>,
}

/// Lookup table from band name to aliases
#[derive(Debug, Clone, Default)]
pub struct BandTable {
    entries: Vec<BandEquivalence>,
    index: HashMap<String, usize>,
}

impl BandTable {
    /// The table shipped with the crate
    pub fn builtin() -> &'static BandTable {
        &BUILTIN
    }

    pub fn new(entries: Vec<BandEquivalence>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            // first definition of a name wins
            index.entry(entry.name.clone()).or_insert(i);
        }
        Self { entries, index }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: BandTableFile =
            toml::from_str(content).context("Failed to parse band equivalence table")?;
        Ok(Self::new(file.bands))
    }

    /// Load a replacement table from a TOML file of the builtin's shape
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read band table: {}", path.display()))?;
        let table = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded {} band equivalences from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Aliases for an exact band name; empty when the name is not listed
    pub fn aliases(&self, band: &str) -> &[String] {
        self.index
            .get(band)
            .map(|&i| self.entries[i].aliases.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, band: &str) -> bool {
        self.index.contains_key(band)
    }

    pub fn entries(&self) -> &[BandEquivalence] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let table = BandTable::builtin();
        assert_eq!(table.len(), 21);
        assert_eq!(table.aliases("LTE 800"), ["Band 20", "B20", "800"]);
        assert_eq!(table.aliases("5G 3500"), ["n78", "3500"]);
        assert_eq!(table.aliases("LTE 700").len(), 9);
    }

    #[test]
    fn test_builtin_covers_all_technologies() {
        let table = BandTable::builtin();
        for name in [
            "GSM 850", "GSM 900", "GSM 1800", "GSM 1900",
            "UMTS 850", "UMTS 900", "UMTS 1900", "UMTS 2100",
            "LTE 700", "LTE 800", "LTE 850", "LTE 900", "LTE 1700",
            "LTE 1800", "LTE 1900", "LTE 2100", "LTE 2300", "LTE 2600",
            "5G 700", "5G 2100", "5G 3500",
        ] {
            assert!(table.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_unknown_band_has_no_aliases() {
        let table = BandTable::builtin();
        assert!(table.aliases("LTE 450").is_empty());
        // lookup is exact, not case-folded
        assert!(table.aliases("lte 800").is_empty());
    }

    #[test]
    fn test_custom_table() {
        let table = BandTable::from_toml_str(
            r#"
            [[band]]
            name = "NR 3700"
            aliases = ["n77"]

            [[band]]
            name = "NR 3700"
            aliases = ["ignored"]
            "#,
        )
        .unwrap();
        assert_eq!(table.aliases("NR 3700"), ["n77"]);
        assert!(BandTable::from_toml_str("[[band]]\naliases = 3").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bands.toml");
        tokio::fs::write(&path, "[[band]]\nname = \"LTE 600\"\naliases = [\"B71\"]\n")
            .await
            .unwrap();

        let table = BandTable::load_from_file(&path).await.unwrap();
        assert_eq!(table.aliases("LTE 600"), ["B71"]);
        assert!(BandTable::load_from_file(dir.path().join("missing.toml")).await.is_err());
    }
}
