//! Device identification from an IMEI
//!
//! ## Resolution order
//! 1. Curated TAC table -> device id -> catalog device
//! 2. Bulk TAC table -> generic "brand model" name -> catalog device, first
//!    by plain containment, then by token overlap
//! 3. Nothing known: report the IMEI checksum, or ask for more digits

use super::imei::{digits, extract_tac, validate_imei, IMEI_LENGTH, TAC_LENGTH};
use super::tac::TacIndex;
use bandcheck_common::Device;
use serde::Serialize;

/// Tokens too common in generic names to tell devices apart
const IGNORED_TOKENS: [&str; 3] = ["apple", "samsung", "google"];

/// Tokens of this many chars or fewer are ignored
const MIN_TOKEN_CHARS: usize = 2;

/// Outcome of a TAC lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TacMatch<'a> {
    /// Curated TAC entry pointing at a catalog device
    Exact { device: &'a Device },
    /// Bulk generic name matched to a catalog device
    Detected { device: &'a Device, generic_name: String },
    /// Bulk generic name known, no catalog device matches it
    Recognized { generic_name: String },
    /// TAC in neither table
    Unknown,
}

/// Outcome of resolving user IMEI input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution<'a> {
    Exact { device: &'a Device },
    Detected { device: &'a Device, generic_name: String },
    Recognized { generic_name: String },
    /// Full IMEI with a valid checksum, model unknown
    ValidUnknown,
    /// Full-length input failing the Luhn check
    InvalidChecksum,
    /// Too few digits to decide
    Incomplete,
}

impl<'a> Resolution<'a> {
    /// The resolved catalog device, if any
    pub fn device(&self) -> Option<&'a Device> {
        match self {
            Resolution::Exact { device } | Resolution::Detected { device, .. } => Some(*device),
            _ => None,
        }
    }

    pub fn generic_name(&self) -> Option<&str> {
        match self {
            Resolution::Detected { generic_name, .. } | Resolution::Recognized { generic_name } => {
                Some(generic_name.as_str())
            }
            _ => None,
        }
    }

    /// User-facing status line; exact matches need none
    pub fn message(&self) -> Option<String> {
        match self {
            Resolution::Exact { .. } => None,
            Resolution::Detected { generic_name, .. } => Some(format!("Detected: {}", generic_name)),
            Resolution::Recognized { generic_name } => Some(format!(
                "Recognized: {}. Specs not found in current database.",
                generic_name
            )),
            Resolution::ValidUnknown => {
                Some("Valid IMEI, but device model not in our database.".to_string())
            }
            Resolution::InvalidChecksum => {
                Some("Invalid IMEI checksum. Please check the digits.".to_string())
            }
            Resolution::Incomplete => {
                Some("Device not recognized. Enter full IMEI for verification.".to_string())
            }
        }
    }
}

/// Look a TAC up in the curated table, then the bulk table
pub fn resolve_tac<'a>(
    tac: &str,
    curated: &TacIndex,
    bulk: &TacIndex,
    devices: &'a [Device],
) -> TacMatch<'a> {
    if let Some(device_id) = curated.get(tac) {
        if let Some(device) = devices.iter().find(|d| d.id == device_id) {
            tracing::debug!("TAC {} -> curated device {}", tac, device.id);
            return TacMatch::Exact { device };
        }
        tracing::debug!("TAC {} maps to '{}' which is not in the catalog", tac, device_id);
    }

    let Some(generic_name) = bulk.get(tac) else {
        return TacMatch::Unknown;
    };

    match match_generic_name(generic_name, devices) {
        Some(device) => {
            tracing::debug!("TAC {} -> '{}' -> {}", tac, generic_name, device.name);
            TacMatch::Detected {
                device,
                generic_name: generic_name.to_string(),
            }
        }
        None => TacMatch::Recognized {
            generic_name: generic_name.to_string(),
        },
    }
}

/// Resolve raw IMEI input (separators allowed, possibly partial)
pub fn resolve_imei<'a>(
    raw: &str,
    curated: &TacIndex,
    bulk: &TacIndex,
    devices: &'a [Device],
) -> Resolution<'a> {
    let cleaned = digits(raw);
    if cleaned.len() < TAC_LENGTH {
        return Resolution::Incomplete;
    }

    match resolve_tac(&extract_tac(&cleaned), curated, bulk, devices) {
        TacMatch::Exact { device } => Resolution::Exact { device },
        TacMatch::Detected {
            device,
            generic_name,
        } => Resolution::Detected {
            device,
            generic_name,
        },
        TacMatch::Recognized { generic_name } => Resolution::Recognized { generic_name },
        TacMatch::Unknown if cleaned.len() >= IMEI_LENGTH => {
            if validate_imei(&cleaned) {
                Resolution::ValidUnknown
            } else {
                Resolution::InvalidChecksum
            }
        }
        TacMatch::Unknown => Resolution::Incomplete,
    }
}

/// Find the catalog device best matching a free-text "brand model" name
pub fn match_generic_name<'a>(generic_name: &str, devices: &'a [Device]) -> Option<&'a Device> {
    strict_match(generic_name, devices).or_else(|| token_match(generic_name, devices))
}

/// Equality or containment either way, case-insensitive; first device wins
pub fn strict_match<'a>(generic_name: &str, devices: &'a [Device]) -> Option<&'a Device> {
    let gn = generic_name.to_lowercase();
    if gn.is_empty() {
        return None;
    }

    devices.iter().find(|d| {
        let name = d.name.to_lowercase();
        !name.is_empty() && (name == gn || gn.contains(&name) || name.contains(&gn))
    })
}

/// Significant tokens of a generic name
pub fn name_tokens(generic_name: &str) -> Vec<String> {
    let cleaned: String = generic_name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_TOKEN_CHARS && !IGNORED_TOKENS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Score devices of the same brand by how many name tokens they contain
///
/// The brand is the first word of the generic name. Ties keep catalog order.
pub fn token_match<'a>(generic_name: &str, devices: &'a [Device]) -> Option<&'a Device> {
    let gn = generic_name.to_lowercase();
    let tokens = name_tokens(&gn);
    let brand = gn.split_whitespace().next()?;

    if tokens.is_empty() {
        return None;
    }

    let mut candidates: Vec<(usize, &Device)> = devices
        .iter()
        .filter_map(|d| {
            let name = d.name.to_lowercase();
            if !name.contains(brand) {
                return None;
            }
            let score = tokens.iter().filter(|t| name.contains(t.as_str())).count();
            (score > 0).then_some((score, d))
        })
        .collect();

    // stable: equal scores keep catalog order
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    candidates
        .first()
        .filter(|(score, _)| *score >= 1)
        .map(|(_, d)| *d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Device> {
        vec![
            Device::new("ip15", "Apple iPhone 15", "{}"),
            Device::new("s21u", "Samsung Galaxy S21 Ultra 5G", "{}"),
            Device::new("10001", "Samsung Galaxy S21 FE", "{}"),
            Device::new("10002", "Samsung Galaxy Note 20", "{}"),
            Device::new("10003", "Nokia 3310", "{}"),
            Device::new("10004", "Google Pixel 8 Pro", "{}"),
        ]
    }

    fn curated() -> TacIndex {
        [("49015420".to_string(), "ip15".to_string())].into_iter().collect()
    }

    fn bulk() -> TacIndex {
        [
            ("35332811".to_string(), "Samsung SM-G998B Galaxy S21 Ultra".to_string()),
            ("35000000".to_string(), "Nokia 3310".to_string()),
            ("35111111".to_string(), "Fairphone FP5".to_string()),
            ("49015420".to_string(), "Should never be used".to_string()),
            ("35222222".to_string(), "Google Pixel 8 Pro (GC3VE)".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_curated_exact_short_circuits() {
        let devices = catalog();
        let result = resolve_tac("49015420", &curated(), &bulk(), &devices);
        assert_eq!(result, TacMatch::Exact { device: &devices[0] });

        let resolution = resolve_imei("490154203237518", &curated(), &bulk(), &devices);
        assert_eq!(resolution.device().map(|d| d.id.as_str()), Some("ip15"));
        assert_eq!(resolution.message(), None);
    }

    #[test]
    fn test_curated_id_missing_from_catalog_falls_back() {
        let devices: Vec<Device> = catalog().into_iter().skip(1).collect();
        let result = resolve_tac("49015420", &curated(), &bulk(), &devices);
        assert_eq!(
            result,
            TacMatch::Recognized {
                generic_name: "Should never be used".to_string()
            }
        );
    }

    #[test]
    fn test_strict_match() {
        let devices = catalog();
        // generic name contains the catalog name
        let nokia = strict_match("Nokia 3310", &devices).unwrap();
        assert_eq!(nokia.id, "10003");
        // catalog name contains the generic name
        let note = strict_match("galaxy note", &devices).unwrap();
        assert_eq!(note.id, "10002");
        assert!(strict_match("", &devices).is_none());
    }

    #[test]
    fn test_name_tokens() {
        assert_eq!(
            name_tokens("Samsung SM-G998B Galaxy S21 Ultra"),
            vec!["g998b", "galaxy", "s21", "ultra"]
        );
        assert_eq!(name_tokens("Apple iPhone 15 (A3090)"), vec!["iphone", "a3090"]);
        assert!(name_tokens("LG G5").is_empty());
    }

    #[test]
    fn test_token_match_scores() {
        let devices = catalog();
        let device = token_match("Samsung SM-G998B Galaxy S21 Ultra", &devices).unwrap();
        // "galaxy", "s21", "ultra" beat "galaxy", "s21"
        assert_eq!(device.id, "s21u");
    }

    #[test]
    fn test_token_match_tie_keeps_catalog_order() {
        let devices = catalog();
        let device = token_match("Samsung Galaxy S21", &devices).unwrap();
        assert_eq!(device.id, "s21u");
    }

    #[test]
    fn test_token_match_brand_filter() {
        let devices = catalog();
        // tokens overlap with Samsung devices, but the brand word does not
        assert!(token_match("Xiaomi Galaxy Ultra", &devices).is_none());
        assert!(token_match("", &devices).is_none());
    }

    #[test]
    fn test_bulk_detected() {
        let devices = catalog();
        let resolution = resolve_imei("35332811-000000-0", &curated(), &bulk(), &devices);
        assert_eq!(resolution.device().map(|d| d.id.as_str()), Some("s21u"));
        assert_eq!(
            resolution.message().as_deref(),
            Some("Detected: Samsung SM-G998B Galaxy S21 Ultra")
        );

        let resolution = resolve_imei("35222222", &curated(), &bulk(), &devices);
        assert_eq!(resolution.device().map(|d| d.id.as_str()), Some("10004"));
    }

    #[test]
    fn test_bulk_recognized_without_catalog_device() {
        let devices = catalog();
        let resolution = resolve_imei("351111110000000", &curated(), &bulk(), &devices);
        assert_eq!(
            resolution,
            Resolution::Recognized {
                generic_name: "Fairphone FP5".to_string()
            }
        );
        assert_eq!(resolution.generic_name(), Some("Fairphone FP5"));
        assert!(resolution.device().is_none());
    }

    #[test]
    fn test_unknown_tac_checksum() {
        let devices = catalog();
        let (c, b) = (curated(), bulk());
        // TAC of the valid test vector, but not in either table
        assert_eq!(resolve_imei("352099001761481", &c, &b, &devices), Resolution::ValidUnknown);
        assert_eq!(resolve_imei("352099001761482", &c, &b, &devices), Resolution::InvalidChecksum);
        assert_eq!(resolve_imei("35209900176", &c, &b, &devices), Resolution::Incomplete);
        assert_eq!(resolve_imei("3520", &c, &b, &devices), Resolution::Incomplete);
        assert_eq!(resolve_imei("", &c, &b, &devices), Resolution::Incomplete);
    }

    #[test]
    fn test_empty_catalog_and_tables() {
        let empty = TacIndex::empty();
        assert_eq!(resolve_imei("490154203237518", &empty, &empty, &[]), Resolution::ValidUnknown);
        assert_eq!(
            resolve_imei("490154203237518", &curated(), &bulk(), &[]),
            Resolution::Recognized {
                generic_name: "Should never be used".to_string()
            }
        );
    }

    #[test]
    fn test_resolution_serializes_tagged() {
        let json = serde_json::to_value(Resolution::InvalidChecksum).unwrap();
        assert_eq!(json["kind"], "invalid_checksum");
    }
}
