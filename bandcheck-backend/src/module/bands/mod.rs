//! Band handling
//!
//! - `normalizer`: raw band strings to tokens
//! - `equivalence`: legacy band names and their aliases
//! - `matcher`: device vs operator compatibility

mod normalizer;
pub use normalizer::{device_bands, parse_bands, spec_bands};

mod equivalence;
pub use equivalence::{BandEquivalence, BandTable};

mod matcher;
pub use matcher::{check_compatibility, check_device, Compatibility, SupportLevel};
