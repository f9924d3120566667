//! Per-country carrier list
//!
//! Raw carrier catalogs list one record per MCC-MNC pair, so one commercial
//! network often shows up several times. This module filters a country,
//! fixes known brand spellings, drops duplicates and adds virtual sub-brands.

use super::corrections::{CorrectionTable, CountryCorrections};
use bandcheck_common::{normalize_name, Operator, RawOperator};
use std::collections::{BTreeSet, HashSet};

/// Operational carriers of `country`, deduplicated and sorted by display name
///
/// Deduplication keeps the first record for each `(brand, operator, bands)`
/// merge key. Later records with the same key are dropped, even when their
/// MCC-MNC differs.
pub fn operators_by_country(
    all: &[RawOperator],
    country: &str,
    corrections: &CorrectionTable,
) -> Vec<Operator> {
    let country_rules = corrections.for_country(country);

    let mut seen: HashSet<String> = HashSet::new();
    let mut operators: Vec<Operator> = Vec::new();

    for raw in all
        .iter()
        .filter(|o| o.country_name == country && o.is_operational())
    {
        let (brand, name) = corrected_names(raw, country_rules);

        let merge_key = normalize_name(&format!("{}-{}-{}", brand, name, raw.bands));
        if !seen.insert(merge_key) {
            tracing::trace!("Dropping duplicate carrier {}-{} ({})", raw.mcc, raw.mnc, name);
            continue;
        }

        operators.push(Operator::from_raw(raw, brand, name));
    }

    if let Some(rules) = country_rules {
        add_virtual_brands(&mut operators, &mut seen, rules);
    }

    operators.sort_by_cached_key(|o| o.display_name().to_lowercase());

    tracing::debug!("{} carriers listed for {}", operators.len(), country);
    operators
}

/// Brand and operator name after applying the country's correction rules
fn corrected_names(raw: &RawOperator, rules: Option<&CountryCorrections>) -> (String, String) {
    match rules.and_then(|r| r.canonical_name(&raw.brand, &raw.operator)) {
        Some(canonical) => (String::new(), canonical.to_string()),
        None => (raw.brand.clone(), raw.operator.clone()),
    }
}

fn add_virtual_brands(
    operators: &mut Vec<Operator>,
    seen: &mut HashSet<String>,
    rules: &CountryCorrections,
) {
    for virtual_brand in &rules.virtual_brands {
        if seen.contains(&virtual_brand.key) {
            continue;
        }

        let Some(parent) = operators
            .iter()
            .find(|o| o.operator == virtual_brand.parent)
            .cloned()
        else {
            continue;
        };

        seen.insert(virtual_brand.key.clone());
        operators.push(Operator {
            unique_id: virtual_brand.key.clone(),
            brand: virtual_brand.name.clone(),
            operator: virtual_brand.name.clone(),
            ..parent
        });
    }
}

/// Distinct country names, sorted
pub fn countries(all: &[RawOperator]) -> Vec<String> {
    all.iter()
        .filter(|o| !o.country_name.is_empty())
        .map(|o| o.country_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(country: &str, mcc: &str, mnc: &str, brand: &str, operator: &str, bands: &str) -> RawOperator {
        RawOperator {
            country_name: country.to_string(),
            country_code: String::new(),
            mcc: mcc.to_string(),
            mnc: mnc.to_string(),
            brand: brand.to_string(),
            operator: operator.to_string(),
            status: "Operational".to_string(),
            bands: bands.to_string(),
            notes: None,
        }
    }

    fn names(ops: &[Operator]) -> Vec<&str> {
        ops.iter().map(|o| o.display_name()).collect()
    }

    #[test]
    fn test_empty_input() {
        let ops = operators_by_country(&[], "Canada", CorrectionTable::builtin());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_unknown_country() {
        let all = vec![raw("Germany", "262", "01", "Telekom", "Telekom Deutschland", "LTE 800")];
        assert!(operators_by_country(&all, "Atlantis", CorrectionTable::builtin()).is_empty());
    }

    #[test]
    fn test_filters_status_and_country() {
        let mut retired = raw("Germany", "262", "08", "O2", "Telefónica", "GSM 900");
        retired.status = "Not operational".to_string();
        let all = vec![
            raw("Germany", "262", "01", "Telekom", "Telekom Deutschland", "LTE 800"),
            retired,
            raw("Austria", "232", "01", "A1", "A1 Telekom Austria", "LTE 800"),
        ];
        let ops = operators_by_country(&all, "Germany", CorrectionTable::builtin());
        assert_eq!(names(&ops), vec!["Telekom"]);
    }

    #[test]
    fn test_duplicate_records_collapse() {
        let all = vec![
            raw("Germany", "262", "02", "Vodafone", "Vodafone GmbH", "GSM 900 / LTE 800"),
            raw("Germany", "262", "04", "Vodafone", "Vodafone  GmbH", "GSM 900/LTE 800"),
            raw("Germany", "262", "09", "Vodafone", "Vodafone GmbH", "UMTS 2100"),
        ];
        let ops = operators_by_country(&all, "Germany", CorrectionTable::builtin());
        assert_eq!(ops.len(), 2);
        // first record wins
        assert_eq!(ops[0].mnc, "02");
        assert_eq!(ops[0].unique_id, "262-02-vodafone-vodafonegmbh");
        assert_eq!(ops[1].mnc, "09");
    }

    #[test]
    fn test_canada_corrections_and_virtual_brands() {
        let all = vec![
            raw("Canada", "302", "720", "Rogers Wireless", "Rogers Communications", "GSM 850 / LTE 700"),
            raw("Canada", "302", "610", "Bell", "Bell Mobility", "LTE 1700"),
            raw("Canada", "302", "220", "Telus Mobility", "Telus", "LTE 1900"),
            raw("Canada", "302", "500", "Vidéotron", "Vidéotron Ltée", "LTE 1700"),
            raw("Canada", "302", "490", "Freedom Mobile", "Freedom Mobile Inc.", "LTE 2600"),
            raw("Canada", "302", "780", "SaskTel", "SaskTel Mobility", "LTE 1700"),
        ];
        let ops = operators_by_country(&all, "Canada", CorrectionTable::builtin());

        assert_eq!(
            names(&ops),
            vec![
                "Bell",
                "Fido",
                "Freedom Mobile",
                "Koodo",
                "Public Mobile",
                "Rogers",
                "SaskTel",
                "Telus",
                "Videotron",
                "Virgin Plus",
            ]
        );

        let rogers = ops.iter().find(|o| o.operator == "Rogers").unwrap();
        assert_eq!(rogers.brand, "");
        assert_eq!(rogers.unique_id, "302-720--rogers");

        let fido = ops.iter().find(|o| o.unique_id == "fido").unwrap();
        assert_eq!(fido.brand, "Fido");
        assert_eq!(fido.bands, rogers.bands);
        assert_eq!(fido.mnc, "720");
    }

    #[test]
    fn test_virtual_brand_requires_parent() {
        let all = vec![raw("Canada", "302", "610", "Bell", "Bell Mobility", "LTE 1700")];
        let ops = operators_by_country(&all, "Canada", CorrectionTable::builtin());
        assert_eq!(names(&ops), vec!["Bell", "Virgin Plus"]);
    }

    #[test]
    fn test_corrections_merge_duplicate_spellings() {
        let all = vec![
            raw("Canada", "302", "720", "Rogers Wireless", "Rogers Communications", "LTE 700"),
            raw("Canada", "302", "370", "Rogers", "Rogers Communications Canada", "LTE 700"),
        ];
        let ops = operators_by_country(&all, "Canada", &CorrectionTable::empty());
        assert_eq!(ops.len(), 2);

        let ops = operators_by_country(&all, "Canada", CorrectionTable::builtin());
        let rogers: Vec<_> = ops.iter().filter(|o| o.operator == "Rogers").collect();
        assert_eq!(rogers.len(), 1);
        assert_eq!(rogers[0].mnc, "720");
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let all = vec![
            raw("Japan", "440", "10", "docomo", "NTT DOCOMO", "LTE 2100"),
            raw("Japan", "440", "20", "SoftBank", "SoftBank Corp.", "LTE 2100"),
            raw("Japan", "440", "50", "au", "KDDI", "LTE 800"),
            raw("Japan", "440", "11", "", "Rakuten Mobile", "LTE 1700"),
        ];
        let ops = operators_by_country(&all, "Japan", CorrectionTable::builtin());
        assert_eq!(names(&ops), vec!["au", "docomo", "Rakuten Mobile", "SoftBank"]);
    }

    #[test]
    fn test_countries() {
        let all = vec![
            raw("Germany", "262", "01", "", "", ""),
            raw("Canada", "302", "720", "", "", ""),
            raw("Germany", "262", "02", "", "", ""),
            raw("", "000", "00", "", "", ""),
        ];
        assert_eq!(countries(&all), vec!["Canada", "Germany"]);
        assert!(countries(&[]).is_empty());
    }
}
