//! # shard-validate
//!
//! Planning layer for validating data migrated from sharded MySQL or
//! PostgreSQL fleets into Cloud Spanner.
//!
//! This library produces everything a comparison engine needs, without
//! connecting to any database:
//!
//! - **Table catalogs** per source/target dialect pair, with range query
//!   templates checked at load time
//! - **Shard topology** expansion from a compact JSON descriptor into
//!   concrete host/database identities
//! - **Partition boundaries** that split each table's key space into
//!   contiguous `(lower, upper]` ranges
//! - **Validation plans** that bind every partition into paired source and
//!   target queries
//!
//! ## Example
//!
//! ```rust,no_run
//! use shard_validate::{Config, ValidationPlan};
//!
//! #[tokio::main]
//! async fn main() -> shard_validate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let plan = ValidationPlan::from_config(&config).await?;
//!     println!(
//!         "{} shards x {} partitions",
//!         plan.shards.len(),
//!         plan.partitions_per_shard()
//!     );
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod partition;
pub mod plan;
pub mod topology;

// Re-exports for convenient access
pub use catalog::{list_table_specs, TableCatalog};
pub use config::{Config, TopologyConfig, ValidationConfig};
pub use core::{KeyType, KeyValue, TableSpec};
pub use dialect::{Dialect, DialectPair};
pub use error::{Result, ValidateError};
pub use partition::{generate_boundaries, BoundQuery, PartitionQueries, PartitionRange};
pub use plan::{TablePlan, ValidationPlan};
pub use topology::{resolve, LoaderChain, ShardIdentity, ShardTopologySpec};
