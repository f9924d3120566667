//! Carrier catalog normalization
//!
//! ## Main Components
//! - `operators_by_country`: filtered, corrected and deduplicated carrier list
//! - `CorrectionTable`: per-country brand fixes and virtual sub-brands
//! - `find_operator` / `find_country`: user query lookup

mod corrections;
pub use corrections::{BrandRule, CorrectionTable, CountryCorrections, VirtualBrand};

mod normalizer;
pub use normalizer::{countries, operators_by_country};

mod lookup;
pub use lookup::{find_country, find_operator, normalize_query, suggest_operators, DEFAULT_THRESHOLD};
