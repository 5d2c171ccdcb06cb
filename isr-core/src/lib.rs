pub mod calculations;
pub mod models;
pub mod registry;

pub use calculations::{TaxCalculator, TaxEngine};
pub use models::*;
pub use registry::{RegistryError, TaxTableRegistry};
