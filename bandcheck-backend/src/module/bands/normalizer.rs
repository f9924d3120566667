//! Band string tokenizer

use bandcheck_common::{Device, DeviceSpecification};
use regex::Regex;
use std::sync::LazyLock;

/// Placeholder some catalogs use for an unknown band list
const UNKNOWN_BAND: &str = "Unknown";

static BAND_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/,;]+").expect("band separator pattern"));

/// Split a raw band string into tokens
///
/// Runs of `/`, `,` and `;` separate tokens. Tokens are trimmed, and empty
/// tokens or the `Unknown` placeholder are dropped. Input order is kept.
pub fn parse_bands(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    BAND_SEPARATORS
        .split(raw)
        .map(str::trim)
        .filter(|b| !b.is_empty() && *b != UNKNOWN_BAND)
        .map(str::to_string)
        .collect()
}

/// All band tokens a device specification advertises
pub fn spec_bands(spec: &DeviceSpecification) -> Vec<String> {
    parse_bands(&spec.combined_bands())
}

/// All band tokens of a device; a malformed payload yields no bands
pub fn device_bands(device: &Device) -> Vec<String> {
    spec_bands(&device.specification())
}
