//! Expansion of a topology into concrete shard identities.

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::info;

use super::{ShardTopologySpec, MAX_SUFFIX_DIGITS};
use crate::error::{Result, ValidateError};

/// Connection identity of one physical shard.
///
/// Serializes and debug-prints with the password redacted; the connection
/// layer reads it through [`ShardIdentity::password`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShardIdentity {
    pub hostname: String,
    pub database_name: String,
    pub username: String,
    #[serde(serialize_with = "redact")]
    password: String,
}

impl ShardIdentity {
    pub fn new(
        hostname: impl Into<String>,
        database_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            database_name: database_name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ShardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardIdentity")
            .field("hostname", &self.hostname)
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for ShardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.hostname, self.database_name)
    }
}

fn redact<S: Serializer>(_: &str, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}

/// Zero-pad `value` to exactly `digits` decimal digits.
///
/// Fails rather than widening when `value` needs more digits.
pub fn format_suffix(field: &str, value: u64, digits: usize) -> Result<String> {
    if digits > MAX_SUFFIX_DIGITS {
        return Err(ValidateError::validation(
            field,
            format!("width {} exceeds {} digits", digits, MAX_SUFFIX_DIGITS),
        ));
    }
    let formatted = format!("{:0width$}", value, width = digits);
    if formatted.len() > digits {
        return Err(ValidateError::validation(
            field,
            format!("suffix {} does not fit in {} digits", value, digits),
        ));
    }
    Ok(formatted)
}

/// Expand `spec` into every shard identity, ordered by (host, shard).
///
/// Pure and deterministic: equal specs always produce equal sequences, so
/// positions in the result are stable across runs.
pub fn resolve(spec: &ShardTopologySpec) -> Result<Vec<ShardIdentity>> {
    let host_suffixes = suffix_range(spec.hostname_suffix_start(), spec.host_count());
    let shard_suffixes = suffix_range(spec.shard_suffix_start(), spec.shard_count());

    let database_names = shard_suffixes
        .map(|n| {
            let padded = format_suffix("shard-suffix-digits", n, spec.shard_suffix_digits())?;
            Ok(format!(
                "{}{}{}",
                spec.dbname_prefix(),
                padded,
                spec.shard_static_suffix().unwrap_or("")
            ))
        })
        .collect::<Result<Vec<String>>>()?;

    let mut identities = Vec::with_capacity(spec.total_shards() as usize);
    for n in host_suffixes {
        let padded = format_suffix("hostname-suffix-digits", n, spec.hostname_suffix_digits())?;
        let hostname = format!("{}{}", spec.hostname_prefix(), padded);
        for database_name in &database_names {
            identities.push(ShardIdentity::new(
                hostname.clone(),
                database_name.clone(),
                spec.username(),
                spec.password(),
            ));
        }
    }

    info!(
        "Resolved {} shards across {} hosts",
        identities.len(),
        spec.host_count()
    );

    Ok(identities)
}

fn suffix_range(start: u64, count: u32) -> impl Iterator<Item = u64> {
    (0..u64::from(count)).map(move |i| start + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::tests::EXAMPLE;
    use std::collections::HashSet;

    fn spec_from(patch: &[(&str, serde_json::Value)]) -> ShardTopologySpec {
        let mut doc: serde_json::Value = serde_json::from_str(EXAMPLE).unwrap();
        for (key, value) in patch {
            doc[*key] = value.clone();
        }
        ShardTopologySpec::from_json_str(&doc.to_string()).unwrap()
    }

    fn names(identities: &[ShardIdentity]) -> Vec<String> {
        identities.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_example_topology() {
        let spec = ShardTopologySpec::from_json_str(EXAMPLE).unwrap();
        let shards = resolve(&spec).unwrap();
        assert_eq!(
            names(&shards),
            vec!["db01/shard1", "db01/shard2", "db02/shard1", "db02/shard2"]
        );
        assert!(shards.iter().all(|s| s.username == "validator"));
        assert!(shards.iter().all(|s| s.password() == "s3cret"));
    }

    #[test]
    fn test_static_suffix_appended() {
        let spec = spec_from(&[
            ("shard-static-suffix", "_prod".into()),
            ("host-count", 1.into()),
        ]);
        let shards = resolve(&spec).unwrap();
        assert_eq!(names(&shards), vec!["db01/shard1_prod", "db01/shard2_prod"]);
    }

    #[test]
    fn test_zero_based_and_wide_padding() {
        let spec = spec_from(&[
            ("hostname-suffix-start", 0.into()),
            ("hostname-suffix-digits", 3.into()),
            ("shard-suffix-start", 8.into()),
            ("shard-suffix-digits", 4.into()),
        ]);
        let shards = resolve(&spec).unwrap();
        assert_eq!(
            names(&shards),
            vec![
                "db000/shard0008",
                "db000/shard0009",
                "db001/shard0008",
                "db001/shard0009"
            ]
        );
    }

    #[test]
    fn test_count_and_uniqueness() {
        let spec = spec_from(&[
            ("host-count", 12.into()),
            ("shard-count", 25.into()),
            ("shard-suffix-digits", 2.into()),
        ]);
        let shards = resolve(&spec).unwrap();
        assert_eq!(shards.len(), 12 * 25);

        let unique: HashSet<(&str, &str)> = shards
            .iter()
            .map(|s| (s.hostname.as_str(), s.database_name.as_str()))
            .collect();
        assert_eq!(unique.len(), shards.len());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let spec = spec_from(&[("host-count", 5.into()), ("shard-count", 4.into())]);
        assert_eq!(resolve(&spec).unwrap(), resolve(&spec).unwrap());
    }

    #[test]
    fn test_format_suffix() {
        assert_eq!(format_suffix("f", 7, 3).unwrap(), "007");
        assert_eq!(format_suffix("f", 42, 2).unwrap(), "42");
        assert!(matches!(
            format_suffix("f", 100, 2),
            Err(ValidateError::Validation { .. })
        ));
    }

    #[test]
    fn test_format_suffix_width_limit() {
        assert_eq!(format_suffix("f", u64::MAX, 20).unwrap(), u64::MAX.to_string());
        assert!(matches!(
            format_suffix("f", 1, 70000),
            Err(ValidateError::Validation { .. })
        ));
    }

    #[test]
    fn test_identity_redacts_password() {
        let id = ShardIdentity::new("db01", "shard1", "u", "hunter2");
        assert!(!format!("{:?}", id).contains("hunter2"));
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("hunter2"));
    }
}
