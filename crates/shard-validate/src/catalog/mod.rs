//! Compiled-in table catalogs, one per dialect pair.
//!
//! Query templates differ too much between engines to share one table, so
//! each [`DialectPair`] has its own catalog function. [`TableCatalog::load`]
//! validates every entry up front: a bad literal, fraction or template fails
//! here, never at query time.

mod mysql_spanner;
mod postgres_spangres;

use std::collections::HashSet;
use tracing::debug;

use crate::core::{TableSpec, TableSpecDef};
use crate::dialect::DialectPair;
use crate::error::{Result, ValidateError};

/// Raw catalog entries for a dialect pair.
fn catalog_defs(pair: DialectPair) -> Vec<TableSpecDef> {
    match pair {
        DialectPair::MysqlSpanner => mysql_spanner::table_specs(),
        DialectPair::PostgresSpangres => postgres_spangres::table_specs(),
    }
}

/// Validated table specs for `pair`, in catalog order.
pub fn list_table_specs(pair: DialectPair) -> Result<Vec<TableSpec>> {
    TableCatalog::load(pair).map(TableCatalog::into_specs)
}

/// An ordered, validated set of table specs for one dialect pair.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    pair: DialectPair,
    specs: Vec<TableSpec>,
}

impl TableCatalog {
    /// Load and validate the compiled-in catalog for `pair`.
    pub fn load(pair: DialectPair) -> Result<Self> {
        let catalog = Self::from_defs(pair, &catalog_defs(pair))?;
        debug!(
            "Loaded {} table specs for dialect pair {}",
            catalog.specs.len(),
            pair
        );
        Ok(catalog)
    }

    /// Build a catalog from explicit entries.
    ///
    /// Rejects an empty list and duplicate table names (compared
    /// case-insensitively) as configuration defects.
    pub fn from_defs(pair: DialectPair, defs: &[TableSpecDef]) -> Result<Self> {
        if defs.is_empty() {
            return Err(ValidateError::Config(format!(
                "table catalog for {} is empty",
                pair
            )));
        }

        let mut seen = HashSet::new();
        let mut specs = Vec::with_capacity(defs.len());
        for def in defs {
            let spec = TableSpec::new(def, pair)?;
            if !seen.insert(spec.name().to_lowercase()) {
                return Err(ValidateError::Config(format!(
                    "duplicate table '{}' in catalog for {}",
                    spec.name(),
                    pair
                )));
            }
            specs.push(spec);
        }

        Ok(Self { pair, specs })
    }

    pub fn dialect_pair(&self) -> DialectPair {
        self.pair
    }

    pub fn specs(&self) -> &[TableSpec] {
        &self.specs
    }

    pub fn into_specs(self) -> Vec<TableSpec> {
        self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Look up a table by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&TableSpec> {
        self.specs
            .iter()
            .find(|spec| spec.name().eq_ignore_ascii_case(name))
    }

    /// Restrict the catalog to `names`, keeping catalog order.
    ///
    /// An empty list keeps every table. Unknown names are a `Config` error.
    pub fn retain_tables(self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }

        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            let known: Vec<&str> = self.specs.iter().map(|s| s.name()).collect();
            return Err(ValidateError::Config(format!(
                "table '{}' is not in the {} catalog (known: {})",
                unknown,
                self.pair,
                known.join(", ")
            )));
        }

        let specs = self
            .specs
            .into_iter()
            .filter(|spec| names.iter().any(|n| spec.name().eq_ignore_ascii_case(n)))
            .collect();

        Ok(Self {
            pair: self.pair,
            specs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KeyType, KeyValue};

    #[test]
    fn test_builtin_catalogs_load() {
        for pair in DialectPair::ALL {
            let catalog = TableCatalog::load(pair).unwrap();
            assert!(!catalog.is_empty(), "{} catalog is empty", pair);
            assert!(catalog.specs().iter().all(|s| s.dialect_pair() == pair));
        }
    }

    #[test]
    fn test_mysql_spanner_catalog_contents() {
        let specs = list_table_specs(DialectPair::MysqlSpanner).unwrap();
        assert_eq!(specs.len(), 1);
        let customers = &specs[0];
        assert_eq!(customers.name(), "customers");
        assert_eq!(customers.key_type(), KeyType::Integer);
        assert_eq!(customers.max_key(), KeyValue::Int(i32::MAX as i64));
        assert!(customers.target_query().contains("@p1"));
    }

    #[test]
    fn test_postgres_spangres_catalog_order() {
        let specs = list_table_specs(DialectPair::PostgresSpangres).unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["DataProductMetadata", "DataProductRecords"]);
        assert_eq!(specs[0].key_column_index(), 2);
        assert!(specs.iter().all(|s| s.key_type() == KeyType::Uuid));
    }

    #[test]
    fn test_every_table_scans_min_and_max_exactly_once() {
        use crate::partition::bind_table;

        for pair in DialectPair::ALL {
            for spec in list_table_specs(pair).unwrap() {
                let bound = bind_table(&spec).unwrap();
                for key in [spec.min_key(), spec.max_key()] {
                    for side in [0, 1] {
                        let covering = bound
                            .iter()
                            .map(|q| if side == 0 { &q.source } else { &q.target })
                            .filter(|b| b.params[0] < key && key <= b.params[1])
                            .count();
                        assert_eq!(
                            covering,
                            1,
                            "{}: key {} covered by {} partitions",
                            spec.name(),
                            key,
                            covering
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = TableCatalog::from_defs(DialectPair::MysqlSpanner, &[]).unwrap_err();
        assert!(matches!(err, ValidateError::Config(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut defs = mysql_spanner::table_specs();
        let mut dup = defs[0];
        dup.name = "CUSTOMERS";
        defs.push(dup);
        let err = TableCatalog::from_defs(DialectPair::MysqlSpanner, &defs).unwrap_err();
        assert!(err.to_string().contains("duplicate table"));
    }

    #[test]
    fn test_retain_tables() {
        let catalog = TableCatalog::load(DialectPair::PostgresSpangres).unwrap();
        let filtered = catalog
            .clone()
            .retain_tables(&["dataproductrecords".to_string()])
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.specs()[0].name(), "DataProductRecords");

        let all = catalog.clone().retain_tables(&[]).unwrap();
        assert_eq!(all.len(), 2);

        let err = catalog.retain_tables(&["orders".to_string()]).unwrap_err();
        assert!(err.to_string().contains("orders"));
    }
}
