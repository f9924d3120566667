//! Device / operator band compatibility
//!
//! Matching is permissive substring matching rather than token equality:
//! real band strings carry region notes, MHz units and technology prefixes.
//! An operator band counts as supported when any device band
//! - contains it or is contained in it (case-insensitive), or
//! - contains one of its aliases from the [`BandTable`].

use super::equivalence::BandTable;
use super::normalizer::{device_bands, parse_bands};
use bandcheck_common::{Device, Operator};
use serde::{Deserialize, Serialize};

/// Partition of an operator's band list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub supported: Vec<String>,
    pub missing: Vec<String>,
}

/// Overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportLevel {
    Full,
    Partial,
    None,
}

impl SupportLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportLevel::Full => "Full Support",
            SupportLevel::Partial => "Partial Support",
            SupportLevel::None => "No Support",
        }
    }
}

impl std::fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Compatibility {
    /// No operator band is missing
    pub fn is_full(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn total(&self) -> usize {
        self.supported.len() + self.missing.len()
    }

    pub fn level(&self) -> SupportLevel {
        if self.missing.is_empty() {
            SupportLevel::Full
        } else if self.supported.is_empty() {
            SupportLevel::None
        } else {
            SupportLevel::Partial
        }
    }
}

/// Classify every operator band as supported or missing
pub fn check_compatibility<D, O>(
    device_bands: &[D],
    operator_bands: &[O],
    table: &BandTable,
) -> Compatibility
where
    D: AsRef<str>,
    O: AsRef<str>,
{
    let device_lower: Vec<String> = device_bands
        .iter()
        .map(|b| b.as_ref().to_lowercase())
        .collect();

    let mut result = Compatibility::default();

    for op_band in operator_bands {
        let op_band = op_band.as_ref();
        let op_lower = op_band.to_lowercase();
        let aliases: Vec<String> = table
            .aliases(op_band.trim())
            .iter()
            .map(|a| a.to_lowercase())
            .collect();

        let matched = device_lower.iter().any(|db| {
            db.contains(&op_lower)
                || op_lower.contains(db.as_str())
                || aliases.iter().any(|alias| db.contains(alias.as_str()))
        });

        if matched {
            result.supported.push(op_band.to_string());
        } else {
            result.missing.push(op_band.to_string());
        }
    }

    result
}

/// Compare a catalog device against an operator's published bands
pub fn check_device(device: &Device, operator: &Operator, table: &BandTable) -> Compatibility {
    let dev_bands = device_bands(device);
    let op_bands = parse_bands(&operator.bands);
    tracing::debug!(
        "Matching {} device bands of '{}' against {} bands of '{}'",
        dev_bands.len(),
        device.name,
        op_bands.len(),
        operator.display_name()
    );
    check_compatibility(&dev_bands, &op_bands, table)
}
