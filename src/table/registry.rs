//! # Table Registry
//!
//! Maps table names to their row generators. Built once at startup and
//! handed to the engine; nothing is registered while queries run.

use std::collections::HashMap;
use std::fmt;

use super::errors::RegistryError;
use super::generator::RowGenerator;

/// Registry of queryable tables
#[derive(Default)]
pub struct TableRegistry {
    tables: HashMap<String, Box<dyn RowGenerator>>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator under `name`
    pub fn register(
        &mut self,
        name: impl Into<String>,
        generator: impl RowGenerator + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidName(name));
        }
        if self.lookup(&name).is_some() {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.tables.insert(name, Box::new(generator));
        Ok(())
    }

    /// Builder form of [`TableRegistry::register`]
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        generator: impl RowGenerator + 'static,
    ) -> Result<Self, RegistryError> {
        self.register(name, generator)?;
        Ok(self)
    }

    /// Find a generator, exact name first, then case-insensitively
    pub fn lookup(&self, name: &str) -> Option<&dyn RowGenerator> {
        self.tables
            .get(name)
            .or_else(|| {
                self.tables
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(|g| &**g)
    }

    /// Returns true if the table is registered
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered table names, sorted
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRegistry")
            .field("tables", &self.table_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::StaticTable;

    #[test]
    fn test_register_and_lookup() {
        let registry = TableRegistry::new()
            .with_table("processes", StaticTable::default())
            .unwrap();
        assert!(registry.contains("processes"));
        assert!(registry.contains("PROCESSES"));
        assert!(!registry.contains("services"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = TableRegistry::new();
        registry.register("users", StaticTable::default()).unwrap();
        let err = registry
            .register("Users", StaticTable::default())
            .unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("Users".into()));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = TableRegistry::new();
        assert!(matches!(
            registry.register("  ", StaticTable::default()),
            Err(RegistryError::InvalidName(_))
        ));
    }

    #[test]
    fn test_table_names_sorted() {
        let registry = TableRegistry::new()
            .with_table("services", StaticTable::default())
            .unwrap()
            .with_table("etc_hosts", StaticTable::default())
            .unwrap();
        assert_eq!(registry.table_names(), vec!["etc_hosts", "services"]);
        assert_eq!(registry.len(), 2);
        assert!(format!("{:?}", registry).contains("etc_hosts"));
    }
}
