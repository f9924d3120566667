use bandcheck_common::{normalize_name, Device, Operator, RawOperator};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::module::bands::{check_device, BandTable, Compatibility};
use crate::module::device::{self, DeviceQuery, Resolution, TacIndex};
use crate::module::operator::{self, CorrectionTable};

/// Immutable view of every dataset the checker works on
///
/// A published catalog is never mutated; a refresh builds a new one and
/// swaps it into the `CatalogCache`.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub operators: Vec<RawOperator>,
    /// Curated devices first, then the external catalog
    pub devices: Vec<Device>,
    pub curated_tac: TacIndex,
    pub bulk_tac: TacIndex,
    pub bands: BandTable,
    pub corrections: CorrectionTable,
    pub loaded_at: DateTime<Utc>,
}

/// Dataset sizes of one catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub operators: usize,
    pub devices: usize,
    pub curated_devices: usize,
    pub curated_tacs: usize,
    pub bulk_tacs: usize,
    pub band_entries: usize,
    pub loaded_at: DateTime<Utc>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl Catalog {
    /// No operators or devices, builtin lookup tables
    pub fn empty() -> Self {
        Self {
            operators: Vec::new(),
            devices: Vec::new(),
            curated_tac: TacIndex::curated().clone(),
            bulk_tac: TacIndex::empty(),
            bands: BandTable::builtin().clone(),
            corrections: CorrectionTable::builtin().clone(),
            loaded_at: Utc::now(),
        }
    }

    pub fn with_operators(mut self, operators: Vec<RawOperator>) -> Self {
        self.operators = operators;
        self
    }

    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_bulk_tac(mut self, bulk_tac: TacIndex) -> Self {
        self.bulk_tac = bulk_tac;
        self
    }

    pub fn countries(&self) -> Vec<String> {
        operator::countries(&self.operators)
    }

    pub fn operators_by_country(&self, country: &str) -> Vec<Operator> {
        operator::operators_by_country(&self.operators, country, &self.corrections)
    }

    pub fn resolve_imei(&self, raw: &str) -> Resolution<'_> {
        device::resolve_imei(raw, &self.curated_tac, &self.bulk_tac, &self.devices)
    }

    pub fn search_devices(&self, query: &DeviceQuery) -> Vec<&Device> {
        device::search_devices(&self.devices, query)
    }

    pub fn brands(&self) -> Vec<String> {
        device::brands(&self.devices)
    }

    /// Device by id, or by name ignoring case and whitespace
    pub fn find_device(&self, query: &str) -> Option<&Device> {
        if let Some(d) = self.devices.iter().find(|d| d.id == query) {
            return Some(d);
        }
        let normalized = normalize_name(query);
        if normalized.is_empty() {
            return None;
        }
        self.devices.iter().find(|d| d.search_name() == normalized)
    }

    pub fn check(&self, device: &Device, operator: &Operator) -> Compatibility {
        check_device(device, operator, &self.bands)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            operators: self.operators.len(),
            devices: self.devices.len(),
            curated_devices: self.devices.iter().filter(|d| d.provenance.is_curated()).count(),
            curated_tacs: self.curated_tac.len(),
            bulk_tacs: self.bulk_tac.len(),
            band_entries: self.bands.len(),
            loaded_at: self.loaded_at,
        }
    }
}
