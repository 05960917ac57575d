//! Table catalog for PostgreSQL sources migrated to Spanner's PostgreSQL
//! interface.
//!
//! PostgreSQL stores these keys as native `uuid`, so source templates wrap
//! each marker in `uuid(?)`. Spanner keeps them as strings and binds `$1` /
//! `$2` directly.

use crate::core::{KeyType, TableSpecDef};

// Range predicates are `key > lower`, and nothing sorts below the nil UUID,
// so the scanned key space starts one above it. Nil-keyed rows are not
// validated.
const UUID_MIN: &str = "00000000-0000-0000-0000-000000000001";
const UUID_MAX: &str = "ffffffff-ffff-ffff-ffff-ffffffffffff";

pub fn table_specs() -> Vec<TableSpecDef> {
    vec![
        TableSpecDef {
            name: "DataProductMetadata",
            source_query: "select * from \"data-products\".data_product_metadata \
                           where data_product_id > uuid(?) and data_product_id <= uuid(?)",
            target_query: "SELECT key, value, data_product_id FROM data_product_metadata \
                           WHERE data_product_id > $1 AND data_product_id <= $2",
            // data_product_id is the third selected column
            key_column_index: 2,
            partition_fraction: 2,
            key_type: KeyType::Uuid,
            min_key: UUID_MIN,
            max_key: UUID_MAX,
        },
        TableSpecDef {
            name: "DataProductRecords",
            source_query: "select * from \"data-products\".data_product_records \
                           where id > uuid(?) and id <= uuid(?)",
            target_query: "SELECT * FROM data_product_records WHERE id > $1 AND id <= $2",
            key_column_index: 0,
            partition_fraction: 2,
            key_type: KeyType::Uuid,
            min_key: UUID_MIN,
            max_key: UUID_MAX,
        },
    ]
}
