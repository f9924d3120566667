//! Device identification and catalog queries
//!
//! ## Main Components
//! - `validate_imei` / `extract_tac`: IMEI checksum and TAC prefix
//! - `TacIndex`: curated and bulk TAC tables
//! - `resolve_imei`: IMEI input to a catalog device, best effort
//! - `search_devices`: filtered device search

mod imei;
pub use imei::{digits, extract_tac, validate_imei, IMEI_LENGTH, TAC_LENGTH};

mod tac;
pub use tac::TacIndex;

mod resolver;
pub use resolver::{
    match_generic_name, name_tokens, resolve_imei, resolve_tac, strict_match, token_match,
    Resolution, TacMatch,
};

mod search;
pub use search::{
    brands, search_devices, supports_satellite, Capability, DeviceQuery, SimSupport,
    DEFAULT_LIMIT, FILTERED_LIMIT, MIN_QUERY_CHARS,
};
