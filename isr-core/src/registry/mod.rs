pub mod builtin;
mod table_registry;

pub use table_registry::{RegistryError, TaxTableRegistry};
