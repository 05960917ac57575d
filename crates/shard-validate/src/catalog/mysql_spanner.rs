//! Table catalog for MySQL sources migrated to Spanner GoogleSQL.
//!
//! Source templates use positional `?` markers; target templates use the
//! `@p1` / `@p2` named parameters GoogleSQL expects.

use crate::core::{KeyType, TableSpecDef};

pub fn table_specs() -> Vec<TableSpecDef> {
    vec![TableSpecDef {
        name: "customers",
        source_query: "select * from customers where customerNumber > ? and customerNumber <= ?",
        target_query: "select * from customers where customerNumber > @p1 \
                       and customerNumber <= @p2",
        key_column_index: 0,
        partition_fraction: 2,
        key_type: KeyType::Integer,
        min_key: "0",
        max_key: "2147483647",
    }]
}
