//! Loaders that turn files on disk into `isr-core` values: yearly parameter
//! tables (TOML), bracket schedules (CSV), taxpayer profiles (JSON) and
//! taxpayer batches (CSV).

pub mod batch_loader;
pub mod bracket_loader;
pub mod profile_loader;
pub mod table_loader;

pub use batch_loader::BatchLoadError;
pub use bracket_loader::{BracketLoadError, BracketLoader, BracketRecord};
pub use profile_loader::ProfileLoadError;
pub use table_loader::{TableLoadError, TaxTableLoader};
