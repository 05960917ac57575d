//! Table descriptors: how to scan one logical table in key ranges.

use serde::Serialize;

use super::key::{KeyType, KeyValue};
use crate::dialect::DialectPair;
use crate::error::{Result, ValidateError};

/// Raw, unvalidated table descriptor as written in a catalog.
#[derive(Debug, Clone, Copy)]
pub struct TableSpecDef {
    pub name: &'static str,
    pub source_query: &'static str,
    pub target_query: &'static str,
    /// Zero-based ordinal of the key column in the query's result rows.
    pub key_column_index: usize,
    /// Percentage of the key space each partition spans (1..=100).
    pub partition_fraction: i64,
    pub key_type: KeyType,
    pub min_key: &'static str,
    pub max_key: &'static str,
}

/// Validated, immutable table descriptor.
///
/// Construct with [`TableSpec::new`]; no field can change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSpec {
    name: String,
    dialect_pair: DialectPair,
    source_query: String,
    target_query: String,
    key_column_index: usize,
    partition_fraction: u8,
    key_type: KeyType,
    min_key: KeyValue,
    max_key: KeyValue,
    #[serde(skip)]
    first_lower: KeyValue,
}

impl TableSpec {
    /// Validate a raw descriptor for `pair`.
    ///
    /// # Errors
    ///
    /// - `Config` for an empty name, a template without exactly two ordered
    ///   bind markers, `min_key >= max_key`, or a `min_key` at the type
    ///   minimum (no exclusive lower bound can include it)
    /// - `Range` for a partition fraction outside 1..=100
    /// - `TypeMismatch` for a bound literal that does not parse as `key_type`
    pub fn new(def: &TableSpecDef, pair: DialectPair) -> Result<Self> {
        let name = def.name.trim();
        if name.is_empty() {
            return Err(ValidateError::Config("table name cannot be empty".into()));
        }

        if !(1..=100).contains(&def.partition_fraction) {
            return Err(ValidateError::range(name, def.partition_fraction));
        }

        let min_key = def.key_type.parse_literal(name, "min_key", def.min_key)?;
        let max_key = def.key_type.parse_literal(name, "max_key", def.max_key)?;
        if min_key >= max_key {
            return Err(ValidateError::Config(format!(
                "table {}: min_key {} must be below max_key {}",
                name, min_key, max_key
            )));
        }

        let first_lower = min_key.predecessor().ok_or_else(|| {
            ValidateError::Config(format!(
                "table {}: min_key {} is the smallest {} value, so `key > lower` cannot include it",
                name, min_key, def.key_type
            ))
        })?;

        pair.source().validate_range_template(name, def.source_query)?;
        pair.target().validate_range_template(name, def.target_query)?;

        Ok(Self {
            name: name.to_string(),
            dialect_pair: pair,
            source_query: def.source_query.to_string(),
            target_query: def.target_query.to_string(),
            key_column_index: def.key_column_index,
            partition_fraction: def.partition_fraction as u8,
            key_type: def.key_type,
            min_key,
            max_key,
            first_lower,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect_pair(&self) -> DialectPair {
        self.dialect_pair
    }

    pub fn source_query(&self) -> &str {
        &self.source_query
    }

    pub fn target_query(&self) -> &str {
        &self.target_query
    }

    pub fn key_column_index(&self) -> usize {
        self.key_column_index
    }

    pub fn partition_fraction(&self) -> u8 {
        self.partition_fraction
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn min_key(&self) -> KeyValue {
        self.min_key
    }

    pub fn max_key(&self) -> KeyValue {
        self.max_key
    }

    /// Exclusive lower bind value for the first partition: the value just
    /// below `min_key`.
    pub fn first_partition_lower(&self) -> KeyValue {
        self.first_lower
    }
}
