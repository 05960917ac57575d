//! Core value types shared by the catalog, the partition generator and the
//! plan builder.
//!
//! - [`key`]: key types and key values with their range arithmetic
//! - [`table_spec`]: validated, immutable table descriptors

pub mod key;
pub mod table_spec;

pub use key::{KeyType, KeyValue};
pub use table_spec::{TableSpec, TableSpecDef};
