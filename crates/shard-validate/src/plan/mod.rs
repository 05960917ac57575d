//! Validation plans: the full enumeration handed to an execution layer.
//!
//! A plan lists every shard identity and, per table, every partition's
//! bound (source, target) query pair. Two independent passes over the same
//! inputs produce the same plan, which [`ValidationPlan::fingerprint`] makes
//! cheap to confirm.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::catalog::TableCatalog;
use crate::config::Config;
use crate::core::KeyType;
use crate::dialect::DialectPair;
use crate::error::Result;
use crate::partition::{bind_table, PartitionQueries};
use crate::topology::{resolve, LoaderChain, ShardIdentity, ShardTopologySpec};

/// Bound partitions for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePlan {
    pub table: String,
    pub key_type: KeyType,
    pub partition_fraction: u8,
    pub partitions: Vec<PartitionQueries>,
}

/// Every shard and every partition query for one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationPlan {
    pub dialect_pair: DialectPair,
    pub shards: Vec<ShardIdentity>,
    pub tables: Vec<TablePlan>,
}

impl ValidationPlan {
    /// Build a plan from an already-loaded topology and catalog.
    pub fn build(topology: &ShardTopologySpec, catalog: &TableCatalog) -> Result<Self> {
        let shards = resolve(topology)?;

        let tables = catalog
            .specs()
            .iter()
            .map(|spec| {
                Ok(TablePlan {
                    table: spec.name().to_string(),
                    key_type: spec.key_type(),
                    partition_fraction: spec.partition_fraction(),
                    partitions: bind_table(spec)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let plan = Self {
            dialect_pair: catalog.dialect_pair(),
            shards,
            tables,
        };

        info!(
            "Plan for {}: {} shards, {} tables, {} partition queries per shard",
            plan.dialect_pair,
            plan.shards.len(),
            plan.tables.len(),
            plan.partitions_per_shard()
        );

        Ok(plan)
    }

    /// Load the topology and catalog named by `config` and build the plan.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let topology = LoaderChain::from_config(&config.topology).load().await?;
        let catalog = TableCatalog::load(config.validation.dialect_pair)?
            .retain_tables(&config.validation.tables)?;
        Self::build(&topology, &catalog)
    }

    /// Partitions summed over all tables.
    pub fn partitions_per_shard(&self) -> usize {
        self.tables.iter().map(|t| t.partitions.len()).sum()
    }

    /// Total (shard, partition) query pairs the plan dispatches.
    pub fn total_query_pairs(&self) -> usize {
        self.shards.len() * self.partitions_per_shard()
    }

    /// Pretty JSON rendering; passwords are redacted.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA256 over the plan's compact JSON form.
    ///
    /// Passwords are redacted before hashing, so rotating credentials does
    /// not change the fingerprint.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }
}
