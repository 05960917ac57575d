//! SQL dialects and dialect pairs.
//!
//! Dialects form a closed set. Each one knows its bind-marker syntax and how
//! to render a key value as a literal, including the casts some engines need
//! for UUIDs.
//!
//! # Available Pairs
//!
//! - [`DialectPair::MysqlSpanner`]: MySQL (`?`) → Spanner GoogleSQL (`@p1`)
//! - [`DialectPair::PostgresSpangres`]: PostgreSQL (`?`) → Spanner PostgreSQL (`$1`)

pub mod placeholder;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::KeyValue;
use crate::error::{Result, ValidateError};
use placeholder::{MarkerStyle, Placeholder};

/// Number of bind markers every range template carries: lower, then upper.
pub const RANGE_PARAM_COUNT: usize = 2;

/// A SQL engine's parameter and literal conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// MySQL via JDBC-style positional markers.
    Mysql,
    /// Cloud Spanner GoogleSQL with `@pN` named parameters.
    GoogleSql,
    /// PostgreSQL via JDBC-style positional markers.
    Postgres,
    /// Cloud Spanner PostgreSQL interface with `$N` parameters.
    Spangres,
}

impl Dialect {
    /// Short identifier (e.g. "mysql", "spangres").
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::GoogleSql => "googlesql",
            Dialect::Postgres => "postgres",
            Dialect::Spangres => "spangres",
        }
    }

    /// Marker syntax used by templates written for this dialect.
    pub fn marker_style(&self) -> MarkerStyle {
        match self {
            Dialect::Mysql | Dialect::Postgres => MarkerStyle::Positional,
            Dialect::GoogleSql => MarkerStyle::AtNamed,
            Dialect::Spangres => MarkerStyle::DollarNumbered,
        }
    }

    /// The marker for the 1-based parameter `index`.
    pub fn param_placeholder(&self, index: usize) -> String {
        match self.marker_style() {
            MarkerStyle::Positional => "?".to_string(),
            MarkerStyle::AtNamed => format!("@p{}", index),
            MarkerStyle::DollarNumbered => format!("${}", index),
        }
    }

    /// Render a key value as an inline SQL literal.
    pub fn literal(&self, value: &KeyValue) -> String {
        match (self, value) {
            (_, KeyValue::Int(v)) => v.to_string(),
            (Dialect::Postgres, KeyValue::Uuid(_)) => format!("'{}'::uuid", value),
            (_, KeyValue::Uuid(_)) => format!("'{}'", value),
        }
    }

    /// Bind markers present in `sql`, in textual order.
    pub fn placeholders(&self, sql: &str) -> Vec<Placeholder> {
        placeholder::scan(sql, self.marker_style())
    }

    /// Check that `sql` carries exactly the lower and upper range markers,
    /// lower first.
    pub fn validate_range_template(&self, table: &str, sql: &str) -> Result<()> {
        let found = self.placeholders(sql);
        let ordinals: Vec<usize> = found.iter().map(|p| p.ordinal).collect();
        if ordinals != [1, 2] {
            return Err(ValidateError::Config(format!(
                "table {}: {} template must contain exactly {} ordered bind markers ({} then {}), found {:?}",
                table,
                self.name(),
                RANGE_PARAM_COUNT,
                self.param_placeholder(1),
                self.param_placeholder(2),
                ordinals
            )));
        }
        Ok(())
    }

    /// Substitute `params` into `sql` as inline literals.
    ///
    /// Marker ordinal `n` takes `params[n - 1]`; markers without a matching
    /// parameter are left as written.
    pub fn render_inline(&self, sql: &str, params: &[KeyValue]) -> String {
        let mut out = String::with_capacity(sql.len() + 64);
        let mut cursor = 0;
        for marker in self.placeholders(sql) {
            let Some(value) = marker.ordinal.checked_sub(1).and_then(|i| params.get(i)) else {
                continue;
            };
            out.push_str(&sql[cursor..marker.start]);
            out.push_str(&self.literal(value));
            cursor = marker.end;
        }
        out.push_str(&sql[cursor..]);
        out
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (source, target) dialect combination with its own table catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectPair {
    /// MySQL source, Spanner GoogleSQL target.
    MysqlSpanner,
    /// PostgreSQL source, Spanner PostgreSQL-interface target.
    #[default]
    PostgresSpangres,
}

impl DialectPair {
    /// Every supported pair.
    pub const ALL: [DialectPair; 2] = [DialectPair::MysqlSpanner, DialectPair::PostgresSpangres];

    pub fn source(&self) -> Dialect {
        match self {
            DialectPair::MysqlSpanner => Dialect::Mysql,
            DialectPair::PostgresSpangres => Dialect::Postgres,
        }
    }

    pub fn target(&self) -> Dialect {
        match self {
            DialectPair::MysqlSpanner => Dialect::GoogleSql,
            DialectPair::PostgresSpangres => Dialect::Spangres,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DialectPair::MysqlSpanner => "mysql_spanner",
            DialectPair::PostgresSpangres => "postgres_spangres",
        }
    }
}

impl fmt::Display for DialectPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectPair {
    type Err = ValidateError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        DialectPair::ALL
            .into_iter()
            .find(|pair| pair.name() == wanted)
            .ok_or_else(|| {
                ValidateError::Config(format!(
                    "unknown dialect pair '{}', expected one of: mysql_spanner, postgres_spangres",
                    s
                ))
            })
    }
}
