//! Binding partition ranges into a table's source and target templates.

use serde::Serialize;

use super::{generate_boundaries, PartitionRange};
use crate::core::{KeyValue, TableSpec};
use crate::dialect::Dialect;
use crate::error::Result;

/// A range template with its two parameters bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundQuery {
    /// Dialect the template is written in.
    pub dialect: Dialect,
    /// The template as authored, markers intact.
    pub template: String,
    /// Parameters in marker order: exclusive lower, inclusive upper.
    pub params: [KeyValue; 2],
}

impl BoundQuery {
    /// The query with parameters rendered as inline dialect literals.
    ///
    /// Intended for logs and dry runs; executors should bind `params`.
    pub fn inline_sql(&self) -> String {
        self.dialect.render_inline(&self.template, &self.params)
    }
}

/// The source and target queries for one partition of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionQueries {
    pub range: PartitionRange,
    /// Result column holding the key, for the comparison engine.
    pub key_column_index: usize,
    pub source: BoundQuery,
    pub target: BoundQuery,
}

/// Bind one partition range into both of `spec`'s templates.
pub fn bind_partition(spec: &TableSpec, range: &PartitionRange) -> PartitionQueries {
    let params = [range.lower_bind_value(spec.first_partition_lower()), range.upper];
    let pair = spec.dialect_pair();

    PartitionQueries {
        range: *range,
        key_column_index: spec.key_column_index(),
        source: BoundQuery {
            dialect: pair.source(),
            template: spec.source_query().to_string(),
            params,
        },
        target: BoundQuery {
            dialect: pair.target(),
            template: spec.target_query().to_string(),
            params,
        },
    }
}

/// Generate and bind every partition of `spec`, in partition order.
pub fn bind_table(spec: &TableSpec) -> Result<Vec<PartitionQueries>> {
    Ok(generate_boundaries(spec)?
        .iter()
        .map(|range| bind_partition(spec, range))
        .collect())
}
