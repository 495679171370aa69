//! Tables and their row generators
//!
//! The per-table generators (processes, services, ...) live outside the
//! engine. This module defines the contract they implement and the registry
//! the engine resolves FROM names against.

mod errors;
mod generator;
mod registry;

pub use errors::{GeneratorError, GeneratorResult, RegistryError};
pub use generator::{RowGenerator, StaticTable};
pub use registry::TableRegistry;
