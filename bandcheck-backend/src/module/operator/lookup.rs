//! Name lookup for carriers and countries typed by a user
use bandcheck_common::Operator;
use strsim::jaro_winkler;

/// Default similarity threshold for fuzzy suggestions
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Normalize string for matching (lowercase, remove punctuation and whitespace)
pub fn normalize_query(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation() && !c.is_whitespace())
        .collect()
}

/// Find a carrier by unique id, display name, operator name or MCC-MNC
///
/// # Search Priority
/// 1. Exact unique id
/// 2. Normalized display name / operator name
/// 3. `mcc-mnc` network code
pub fn find_operator<'a>(operators: &'a [Operator], query: &str) -> Option<&'a Operator> {
    if let Some(op) = operators.iter().find(|o| o.unique_id == query) {
        return Some(op);
    }

    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return None;
    }

    operators
        .iter()
        .find(|o| {
            normalize_query(o.display_name()) == normalized
                || normalize_query(&o.operator) == normalized
        })
        .or_else(|| {
            operators
                .iter()
                .find(|o| normalize_query(&o.network_code()) == normalized)
        })
}

/// Carriers whose name is similar to `query`, best first
pub fn suggest_operators<'a>(
    operators: &'a [Operator],
    query: &str,
    threshold: f64,
) -> Vec<&'a Operator> {
    let query_lower = query.to_lowercase();
    let mut matches: Vec<(f64, &Operator)> = operators
        .iter()
        .filter_map(|o| {
            let score = jaro_winkler(&query_lower, &o.display_name().to_lowercase())
                .max(jaro_winkler(&query_lower, &o.operator.to_lowercase()));
            (score >= threshold).then_some((score, o))
        })
        .collect();

    // Sort by score descending
    matches.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    matches.into_iter().map(|(_, o)| o).collect()
}

/// Resolve a typed country name against the known list
///
/// Exact (case-insensitive) match first, then the closest name above the
/// threshold.
pub fn find_country<'a>(countries: &'a [String], query: &str, threshold: f64) -> Option<&'a str> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return None;
    }

    if let Some(c) = countries.iter().find(|c| normalize_query(c) == normalized) {
        return Some(c.as_str());
    }

    let query_lower = query.trim().to_lowercase();
    countries
        .iter()
        .map(|c| (jaro_winkler(&query_lower, &c.to_lowercase()), c))
        .filter(|(score, _)| *score >= threshold)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, c)| c.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandcheck_common::RawOperator;

    fn operators() -> Vec<Operator> {
        let raw = |mcc: &str, mnc: &str| RawOperator {
            mcc: mcc.to_string(),
            mnc: mnc.to_string(),
            ..Default::default()
        };
        vec![
            Operator::from_raw(&raw("262", "01"), "Telekom".to_string(), "Telekom Deutschland GmbH".to_string()),
            Operator::from_raw(&raw("262", "02"), "Vodafone".to_string(), "Vodafone GmbH".to_string()),
            Operator::from_raw(&raw("262", "03"), "O2".to_string(), "Telefónica Germany".to_string()),
        ]
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(" T-Mobile US "), "tmobileus");
        assert_eq!(normalize_query("Public Mobile"), "publicmobile");
    }

    #[test]
    fn test_find_by_name() {
        let ops = operators();
        assert_eq!(find_operator(&ops, "vodafone").unwrap().mnc, "02");
        assert_eq!(find_operator(&ops, "Telekom Deutschland GmbH").unwrap().mnc, "01");
        assert_eq!(find_operator(&ops, "o 2").unwrap().mnc, "03");
    }

    #[test]
    fn test_find_by_unique_id_and_code() {
        let ops = operators();
        assert_eq!(find_operator(&ops, "262-02-vodafone-vodafonegmbh").unwrap().brand, "Vodafone");
        assert_eq!(find_operator(&ops, "262-03").unwrap().brand, "O2");
        assert!(find_operator(&ops, "").is_none());
        assert!(find_operator(&ops, "Orange").is_none());
    }

    #[test]
    fn test_suggestions() {
        let ops = operators();
        let suggestions = suggest_operators(&ops, "Vodafon", DEFAULT_THRESHOLD);
        assert_eq!(suggestions.first().map(|o| o.brand.as_str()), Some("Vodafone"));
        assert!(suggest_operators(&ops, "zzzz", DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_find_country() {
        let countries = vec!["Canada".to_string(), "Germany".to_string(), "United Kingdom".to_string()];
        assert_eq!(find_country(&countries, "germany", DEFAULT_THRESHOLD), Some("Germany"));
        assert_eq!(find_country(&countries, "United Kingdon", DEFAULT_THRESHOLD), Some("United Kingdom"));
        assert_eq!(find_country(&countries, "Peru", DEFAULT_THRESHOLD), None);
        assert_eq!(find_country(&countries, "  ", DEFAULT_THRESHOLD), None);
    }
}
