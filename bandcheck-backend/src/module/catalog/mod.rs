//! Catalog data: loading, snapshot cache, TAC preprocessing
//!
//! ## Main Components
//! - `Catalog`: one immutable snapshot of operators, devices and lookup tables
//! - `CatalogCache`: the published snapshot, swapped on refresh
//! - `CatalogLoader`: fetches every dataset from URLs or local files
//! - `process_tac_file`: builds the bulk TAC database from the master file

mod error;
pub use error::{CatalogError, CatalogResult};

mod types;
pub use types::{Catalog, CatalogStats};

mod cache;
pub use cache::CatalogCache;

mod loader;
pub use loader::{merge_devices, CatalogLoader, Source};

mod tac_lite;
pub use tac_lite::{build_tac_lite, process_tac_file};
