//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML file without validating it.
    ///
    /// For callers that apply overrides first and call [`Config::validate`]
    /// afterwards.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Compute a SHA256 hash of the configuration.
    pub fn hash(&self) -> String {
        let yaml = serde_yaml::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(yaml.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectPair;
    use crate::error::ValidateError;

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
topology:
  resource: sample-shard-spec.json
  path: gs://specs/prod/topology.json
  object_store_root: /mnt/gcs
validation:
  dialect_pair: mysql_spanner
  tables: [customers]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.validation.dialect_pair, DialectPair::MysqlSpanner);
        assert_eq!(config.validation.tables, vec!["customers".to_string()]);
        assert_eq!(
            config.topology.path.as_deref(),
            Some("gs://specs/prod/topology.json")
        );
    }

    #[test]
    fn test_validation_defaults() {
        let config = Config::from_yaml("topology:\n  path: ./topology.json\n").unwrap();
        assert_eq!(config.validation.dialect_pair, DialectPair::PostgresSpangres);
        assert!(config.validation.tables.is_empty());
    }

    #[test]
    fn test_unknown_dialect_pair_rejected() {
        let yaml = "topology:\n  path: t.json\nvalidation:\n  dialect_pair: oracle_spanner\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ValidateError::Yaml(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("/no/such/config.yaml").unwrap_err();
        assert!(matches!(err, ValidateError::Io(_)));
    }

    #[test]
    fn test_read_defers_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"validation:\n  dialect_pair: mysql_spanner\n")
            .unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(ValidateError::Config(_))
        ));

        let mut config = Config::read(file.path()).unwrap();
        assert_eq!(config.validation.dialect_pair, DialectPair::MysqlSpanner);
        assert!(config.validate().is_err());

        config.topology.path = Some("./topology.json".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hash_is_stable_and_sensitive() {
        let a = Config::from_yaml("topology:\n  path: a.json\n").unwrap();
        let b = Config::from_yaml("topology:\n  path: b.json\n").unwrap();
        assert_eq!(a.hash(), a.clone().hash());
        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);
    }
}
