//! Partition boundary generation.
//!
//! Splits a table's key space `[min_key, max_key]` into
//! `ceil(100 / partition_fraction)` half-open ranges `(lower, upper]`.
//! Partition 0 has no lower bound, each later partition starts where the
//! previous one ended, and the last one ends exactly at `max_key`.
//!
//! Integer and UUID keys share one algorithm over unsigned offsets from
//! `min_key`: an `i64` span always fits in `u128`, and a UUID is already a
//! 128-bit unsigned value.

pub mod bind;

pub use bind::{bind_partition, bind_table, BoundQuery, PartitionQueries};

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::core::{KeyValue, TableSpec};
use crate::error::{Result, ValidateError};

/// One half-open key range `(lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartitionRange {
    /// Partition ID (0-based).
    pub index: usize,
    /// Exclusive lower bound; `None` means unbounded below.
    pub lower: Option<KeyValue>,
    /// Inclusive upper bound.
    pub upper: KeyValue,
}

impl PartitionRange {
    /// Lower value to bind into a `key > ?` predicate.
    ///
    /// For the unbounded first partition this is `first_lower`, the value
    /// just below the table's minimum key (see
    /// [`TableSpec::first_partition_lower`]), so the minimum itself is
    /// scanned.
    pub fn lower_bind_value(&self, first_lower: KeyValue) -> KeyValue {
        self.lower.unwrap_or(first_lower)
    }

    /// Whether the range can contain any key.
    pub fn is_empty(&self) -> bool {
        matches!(self.lower, Some(lower) if lower >= self.upper)
    }
}

impl fmt::Display for PartitionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Some(lower) => write!(f, "({}, {}]", lower, self.upper),
            None => write!(f, "(-inf, {}]", self.upper),
        }
    }
}

/// Number of partitions for a key-space fraction: `ceil(100 / fraction)`.
pub fn partition_count(table: &str, partition_fraction: i64) -> Result<usize> {
    if !(1..=100).contains(&partition_fraction) {
        return Err(ValidateError::range(table, partition_fraction));
    }
    let fraction = partition_fraction as usize;
    Ok(100_usize.div_ceil(fraction))
}

/// Generate the ordered partition ranges for `spec`.
pub fn generate_boundaries(spec: &TableSpec) -> Result<Vec<PartitionRange>> {
    let count = partition_count(spec.name(), i64::from(spec.partition_fraction()))?;
    let ranges = split_key_space(spec.name(), spec.min_key(), spec.max_key(), count)?;

    debug!(
        "Table {}: {} partitions over {}..={} ({} key type)",
        spec.name(),
        ranges.len(),
        spec.min_key(),
        spec.max_key(),
        spec.key_type()
    );

    Ok(ranges)
}

/// Split `[min_key, max_key]` into `count` chained ranges.
///
/// Every non-final partition spans `ceil(span / count)` keys, clamped at
/// `max_key`; the final partition absorbs the remainder and always ends at
/// `max_key` exactly. When `count` exceeds the span, trailing partitions
/// clamp to empty ranges `(max_key, max_key]` so the count stays fixed.
pub fn split_key_space(
    table: &str,
    min_key: KeyValue,
    max_key: KeyValue,
    count: usize,
) -> Result<Vec<PartitionRange>> {
    if count == 0 {
        return Err(ValidateError::Config(format!(
            "table {}: partition count must be at least 1",
            table
        )));
    }

    let span = min_key.offset_to(&max_key).ok_or_else(|| {
        ValidateError::type_mismatch(
            table,
            "max_key",
            max_key.to_string(),
            format!("{} at or above min_key {}", min_key.key_type(), min_key),
        )
    })?;

    let parts = count as u128;
    let step = span / parts + u128::from(span % parts != 0);

    let mut ranges = Vec::with_capacity(count);
    let mut lower = None;
    for index in 0..count {
        let upper = if index + 1 == count {
            max_key
        } else {
            let offset = step
                .checked_mul(index as u128 + 1)
                .map_or(span, |o| o.min(span));
            min_key.add_offset(offset)
        };
        ranges.push(PartitionRange {
            index,
            lower,
            upper,
        });
        lower = Some(upper);
    }

    Ok(ranges)
}
