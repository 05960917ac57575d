//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dialect::DialectPair;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where to find the shard topology descriptor.
    #[serde(default)]
    pub topology: TopologyConfig,

    /// Which catalog to plan and how to narrow it.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Topology descriptor locations, tried in order: embedded resource, then
/// `path` (object store first when it starts with `gs://`, then the local
/// filesystem).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Name of a descriptor compiled into the binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    /// Object-store (`gs://bucket/object`) or local filesystem path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Local directory mirroring object storage as `root/bucket/object`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_store_root: Option<PathBuf>,
}

/// Catalog selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Source/target dialect pair (default: postgres_spangres).
    #[serde(default)]
    pub dialect_pair: DialectPair,

    /// Tables to include; empty means the whole catalog.
    #[serde(default)]
    pub tables: Vec<String>,
}
