//! Shard topology descriptors.
//!
//! A topology descriptor is a small JSON object naming host and database
//! prefixes, suffix ranges and credentials. It is parsed once into an
//! immutable [`ShardTopologySpec`] and expanded by [`resolve`] into one
//! [`ShardIdentity`] per (host, shard) pair.

pub mod loader;
mod resolver;

pub use loader::{
    EmbeddedSource, FileSource, GcsObject, LoaderChain, MirrorObjectStore, ObjectStore,
    ObjectStoreSource, TopologySource,
};
pub use resolver::{format_suffix, resolve, ShardIdentity};

use serde::Deserialize;
use std::fmt;
use tracing::debug;

use crate::error::{Result, ValidateError};

/// Descriptor as it appears on the wire; every field optional so missing
/// keys can be reported by name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawTopology {
    hostname_prefix: Option<String>,
    dbname_prefix: Option<String>,
    host_count: Option<i64>,
    hostname_suffix_start: Option<i64>,
    hostname_suffix_digits: Option<i64>,
    shard_count: Option<i64>,
    shard_suffix_start: Option<i64>,
    shard_suffix_digits: Option<i64>,
    shard_static_suffix: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// Widest suffix the parser accepts: `u64::MAX` has 20 decimal digits.
pub const MAX_SUFFIX_DIGITS: usize = 20;

/// Upper bound on `host-count * shard-count`.
pub const MAX_TOTAL_SHARDS: u64 = 1_000_000;

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| {
        ValidateError::Config(format!(
            "topology descriptor is missing required field '{}'",
            field
        ))
    })
}

/// Validated, immutable shard topology.
#[derive(Clone, PartialEq, Eq)]
pub struct ShardTopologySpec {
    hostname_prefix: String,
    dbname_prefix: String,
    host_count: u32,
    hostname_suffix_start: u64,
    hostname_suffix_digits: usize,
    shard_count: u32,
    shard_suffix_start: u64,
    shard_suffix_digits: usize,
    shard_static_suffix: Option<String>,
    username: String,
    password: String,
}

impl ShardTopologySpec {
    /// Parse and validate a JSON topology descriptor.
    ///
    /// # Errors
    ///
    /// - `Config` for malformed JSON, a missing required key or a
    ///   non-positive count
    /// - `Validation` for a negative suffix start, a zero digit width, or a
    ///   width too narrow for the configured suffix range
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawTopology = serde_json::from_str(json).map_err(|e| {
            ValidateError::Config(format!("invalid topology descriptor: {}", e))
        })?;
        let spec = Self::from_raw(raw)?;
        debug!(
            "Parsed topology: {} hosts x {} shards",
            spec.host_count, spec.shard_count
        );
        Ok(spec)
    }

    fn from_raw(raw: RawTopology) -> Result<Self> {
        let hostname_prefix = required("hostname-prefix", raw.hostname_prefix)?;
        let dbname_prefix = required("dbname-prefix", raw.dbname_prefix)?;
        let host_count = required("host-count", raw.host_count)?;
        let hostname_suffix_start = required("hostname-suffix-start", raw.hostname_suffix_start)?;
        let hostname_suffix_digits =
            required("hostname-suffix-digits", raw.hostname_suffix_digits)?;
        let shard_count = required("shard-count", raw.shard_count)?;
        let shard_suffix_start = required("shard-suffix-start", raw.shard_suffix_start)?;
        let shard_suffix_digits = required("shard-suffix-digits", raw.shard_suffix_digits)?;
        let username = required("username", raw.username)?;
        let password = required("password", raw.password)?;

        let host_count = positive_count("host-count", host_count)?;
        let shard_count = positive_count("shard-count", shard_count)?;
        let hostname_suffix_start = suffix_start("hostname-suffix-start", hostname_suffix_start)?;
        let shard_suffix_start = suffix_start("shard-suffix-start", shard_suffix_start)?;
        let hostname_suffix_digits =
            digit_width("hostname-suffix-digits", hostname_suffix_digits)?;
        let shard_suffix_digits = digit_width("shard-suffix-digits", shard_suffix_digits)?;

        let total = u64::from(host_count) * u64::from(shard_count);
        if total > MAX_TOTAL_SHARDS {
            return Err(ValidateError::validation(
                "host-count, shard-count",
                format!(
                    "{} x {} = {} shards exceeds the limit of {}",
                    host_count, shard_count, total, MAX_TOTAL_SHARDS
                ),
            ));
        }

        check_width(
            "hostname-suffix-digits",
            hostname_suffix_start,
            host_count,
            hostname_suffix_digits,
        )?;
        check_width(
            "shard-suffix-digits",
            shard_suffix_start,
            shard_count,
            shard_suffix_digits,
        )?;

        Ok(Self {
            hostname_prefix,
            dbname_prefix,
            host_count,
            hostname_suffix_start,
            hostname_suffix_digits,
            shard_count,
            shard_suffix_start,
            shard_suffix_digits,
            shard_static_suffix: raw.shard_static_suffix,
            username,
            password,
        })
    }

    pub fn hostname_prefix(&self) -> &str {
        &self.hostname_prefix
    }

    pub fn dbname_prefix(&self) -> &str {
        &self.dbname_prefix
    }

    pub fn host_count(&self) -> u32 {
        self.host_count
    }

    pub fn hostname_suffix_start(&self) -> u64 {
        self.hostname_suffix_start
    }

    pub fn hostname_suffix_digits(&self) -> usize {
        self.hostname_suffix_digits
    }

    pub fn shard_count(&self) -> u32 {
        self.shard_count
    }

    pub fn shard_suffix_start(&self) -> u64 {
        self.shard_suffix_start
    }

    pub fn shard_suffix_digits(&self) -> usize {
        self.shard_suffix_digits
    }

    pub fn shard_static_suffix(&self) -> Option<&str> {
        self.shard_static_suffix.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Number of identities [`resolve`] produces.
    pub fn total_shards(&self) -> u64 {
        u64::from(self.host_count) * u64::from(self.shard_count)
    }
}

impl fmt::Debug for ShardTopologySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardTopologySpec")
            .field("hostname_prefix", &self.hostname_prefix)
            .field("dbname_prefix", &self.dbname_prefix)
            .field("host_count", &self.host_count)
            .field("hostname_suffix_start", &self.hostname_suffix_start)
            .field("hostname_suffix_digits", &self.hostname_suffix_digits)
            .field("shard_count", &self.shard_count)
            .field("shard_suffix_start", &self.shard_suffix_start)
            .field("shard_suffix_digits", &self.shard_suffix_digits)
            .field("shard_static_suffix", &self.shard_static_suffix)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn positive_count(field: &str, value: i64) -> Result<u32> {
    if value <= 0 {
        return Err(ValidateError::Config(format!(
            "{} must be a positive integer, got {}",
            field, value
        )));
    }
    u32::try_from(value).map_err(|_| {
        ValidateError::Config(format!("{} is too large, got {}", field, value))
    })
}

fn suffix_start(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| ValidateError::validation(field, format!("must not be negative, got {}", value)))
}

fn digit_width(field: &str, value: i64) -> Result<usize> {
    match usize::try_from(value) {
        Ok(width) if (1..=MAX_SUFFIX_DIGITS).contains(&width) => Ok(width),
        _ => Err(ValidateError::validation(
            field,
            format!("must be between 1 and {}, got {}", MAX_SUFFIX_DIGITS, value),
        )),
    }
}

/// Fail when the largest suffix in `[start, start + count)` needs more than
/// `digits` decimal digits.
fn check_width(field: &str, start: u64, count: u32, digits: usize) -> Result<()> {
    let last = start
        .checked_add(u64::from(count) - 1)
        .ok_or_else(|| ValidateError::validation(field, "suffix range overflows"))?;
    let needed = last.to_string().len();
    if needed > digits {
        return Err(ValidateError::validation(
            field,
            format!(
                "width {} cannot represent suffix {} ({} digits needed)",
                digits, last, needed
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const EXAMPLE: &str = r#"{
        "hostname-prefix": "db",
        "dbname-prefix": "shard",
        "host-count": 2,
        "hostname-suffix-start": 1,
        "hostname-suffix-digits": 2,
        "shard-count": 2,
        "shard-suffix-start": 1,
        "shard-suffix-digits": 1,
        "username": "validator",
        "password": "s3cret"
    }"#;

    fn with_field(key: &str, value: serde_json::Value) -> String {
        let mut doc: serde_json::Value = serde_json::from_str(EXAMPLE).unwrap();
        doc[key] = value;
        doc.to_string()
    }

    fn without_field(key: &str) -> String {
        let mut doc: serde_json::Value = serde_json::from_str(EXAMPLE).unwrap();
        doc.as_object_mut().unwrap().remove(key);
        doc.to_string()
    }

    #[test]
    fn test_parse_example() {
        let spec = ShardTopologySpec::from_json_str(EXAMPLE).unwrap();
        assert_eq!(spec.hostname_prefix(), "db");
        assert_eq!(spec.host_count(), 2);
        assert_eq!(spec.hostname_suffix_digits(), 2);
        assert_eq!(spec.shard_static_suffix(), None);
        assert_eq!(spec.total_shards(), 4);
    }

    #[test]
    fn test_missing_each_required_field() {
        for key in [
            "hostname-prefix",
            "dbname-prefix",
            "host-count",
            "hostname-suffix-start",
            "hostname-suffix-digits",
            "shard-count",
            "shard-suffix-start",
            "shard-suffix-digits",
            "username",
            "password",
        ] {
            let err = ShardTopologySpec::from_json_str(&without_field(key)).unwrap_err();
            match err {
                ValidateError::Config(msg) => assert!(msg.contains(key), "{msg}"),
                other => panic!("expected Config error for {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_static_suffix_null_is_absent() {
        let json = with_field("shard-static-suffix", serde_json::Value::Null);
        let spec = ShardTopologySpec::from_json_str(&json).unwrap();
        assert_eq!(spec.shard_static_suffix(), None);

        let json = with_field("shard-static-suffix", "_prod".into());
        let spec = ShardTopologySpec::from_json_str(&json).unwrap();
        assert_eq!(spec.shard_static_suffix(), Some("_prod"));
    }

    #[test]
    fn test_wrong_field_type_is_config_error() {
        let json = with_field("host-count", "two".into());
        assert!(matches!(
            ShardTopologySpec::from_json_str(&json),
            Err(ValidateError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            ShardTopologySpec::from_json_str("{ not json"),
            Err(ValidateError::Config(_))
        ));
    }

    #[test]
    fn test_non_positive_count_rejected() {
        let json = with_field("shard-count", 0.into());
        assert!(matches!(
            ShardTopologySpec::from_json_str(&json),
            Err(ValidateError::Config(_))
        ));
    }

    #[test]
    fn test_width_too_narrow() {
        // Hosts 1..=10 need two digits.
        let json = with_field("host-count", 10.into());
        let json = {
            let mut doc: serde_json::Value = serde_json::from_str(&json).unwrap();
            doc["hostname-suffix-digits"] = 1.into();
            doc.to_string()
        };
        let err = ShardTopologySpec::from_json_str(&json).unwrap_err();
        match err {
            ValidateError::Validation { field, message } => {
                assert_eq!(field, "hostname-suffix-digits");
                assert!(message.contains("10"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_width_exactly_fits() {
        let json = with_field("shard-count", 9.into());
        assert!(ShardTopologySpec::from_json_str(&json).is_ok());
    }

    #[test]
    fn test_negative_start_and_zero_width() {
        let json = with_field("shard-suffix-start", (-1).into());
        assert!(matches!(
            ShardTopologySpec::from_json_str(&json),
            Err(ValidateError::Validation { .. })
        ));

        let json = with_field("shard-suffix-digits", 0.into());
        assert!(matches!(
            ShardTopologySpec::from_json_str(&json),
            Err(ValidateError::Validation { .. })
        ));
    }

    #[test]
    fn test_digit_width_upper_bound() {
        let json = with_field("shard-suffix-digits", 20.into());
        let spec = ShardTopologySpec::from_json_str(&json).unwrap();
        assert_eq!(spec.shard_suffix_digits(), 20);
        assert_eq!(resolve(&spec).unwrap()[0].database_name, "shard00000000000000000001");

        for width in [21, 70000] {
            let json = with_field("shard-suffix-digits", width.into());
            match ShardTopologySpec::from_json_str(&json).unwrap_err() {
                ValidateError::Validation { field, .. } => assert_eq!(field, "shard-suffix-digits"),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        let json = with_field("hostname-suffix-digits", 21.into());
        assert!(matches!(
            ShardTopologySpec::from_json_str(&json),
            Err(ValidateError::Validation { ref field, .. }) if field == "hostname-suffix-digits"
        ));
    }

    #[test]
    fn test_total_shards_limit() {
        let mut doc: serde_json::Value = serde_json::from_str(EXAMPLE).unwrap();
        doc["host-count"] = 2_147_483_647_i64.into();
        doc["shard-count"] = 2_147_483_647_i64.into();
        doc["hostname-suffix-digits"] = 10.into();
        doc["shard-suffix-digits"] = 10.into();
        match ShardTopologySpec::from_json_str(&doc.to_string()).unwrap_err() {
            ValidateError::Validation { field, .. } => {
                assert!(field.contains("host-count"));
                assert!(field.contains("shard-count"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        doc["host-count"] = 1000.into();
        doc["shard-count"] = 1000.into();
        let spec = ShardTopologySpec::from_json_str(&doc.to_string()).unwrap();
        assert_eq!(spec.total_shards(), MAX_TOTAL_SHARDS);
    }

    #[test]
    fn test_debug_redacts_password() {
        let spec = ShardTopologySpec::from_json_str(EXAMPLE).unwrap();
        let debug_output = format!("{:?}", spec);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("s3cret"));
    }
}
