//! Plain-text compatibility report
use bandcheck_common::{Device, Operator};
use serde::Serialize;
use std::fmt;

use super::bands::Compatibility;
use super::device::SimSupport;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityReport {
    pub device: String,
    pub sim_type: &'static str,
    pub carrier: String,
    pub network_code: String,
    pub country: String,
    pub compatibility: Compatibility,
}

impl CompatibilityReport {
    pub fn new(device: &Device, operator: &Operator, compatibility: Compatibility) -> Self {
        Self {
            device: device.name.clone(),
            sim_type: SimSupport::of(device).label(),
            carrier: operator.display_name().to_string(),
            network_code: operator.network_code(),
            country: operator.country_name.clone(),
            compatibility,
        }
    }

    /// "Full Support" when no operator band is missing
    pub fn status(&self) -> &'static str {
        if self.compatibility.missing.is_empty() {
            "Full Support"
        } else {
            "Partial Support"
        }
    }
}

impl fmt::Display for CompatibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supported = &self.compatibility.supported;
        let missing = &self.compatibility.missing;

        writeln!(f, "Check My Phone Report")?;
        writeln!(f, "-----------------------")?;
        writeln!(f, "Device: {}", self.device)?;
        writeln!(f, "SIM Type: {}", self.sim_type)?;
        writeln!(f, "Carrier: {} ({})", self.carrier, self.network_code)?;
        writeln!(f, "Country: {}", self.country)?;
        writeln!(f)?;
        writeln!(f, "{}", self.status())?;
        writeln!(f, "Bands: {} Supported / {} Missing", supported.len(), missing.len())?;
        if supported.is_empty() {
            writeln!(f, "Supported: None")?;
        } else {
            writeln!(f, "Supported: {}", supported.join(", "))?;
        }
        if missing.is_empty() {
            write!(f, "All operator bands supported!")
        } else {
            write!(f, "Missing: {}", missing.join(", "))
        }
    }
}
